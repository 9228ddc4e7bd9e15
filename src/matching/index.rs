//! Variant index over the reference collection.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::LinkError;
use crate::matching::variants::generate_variants;
use crate::normalize::normalize_name;

/// What to do when two reference records produce the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// The later record overwrites the earlier mapping.
    #[default]
    LastWriteWins,
    /// The first record to claim a variant keeps it.
    KeepFirst,
    /// A variant claimed by two different canonical names is dropped.
    RejectAmbiguous,
}

impl IndexPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastWriteWins => "last_write_wins",
            Self::KeepFirst => "keep_first",
            Self::RejectAmbiguous => "reject_ambiguous",
        }
    }
}

impl std::fmt::Display for IndexPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IndexPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_write_wins" | "last" => Ok(Self::LastWriteWins),
            "keep_first" | "first" => Ok(Self::KeepFirst),
            "reject_ambiguous" | "reject" => Ok(Self::RejectAmbiguous),
            other => Err(format!("unknown index policy: {}", other)),
        }
    }
}

/// Mapping variant -> canonical reference name. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct VariantIndex {
    map: HashMap<String, String>,
    /// Variants whose mapping was contested by a different canonical name.
    collisions: usize,
    ambiguous: HashSet<String>,
}

impl VariantIndex {
    /// Build the index from the reference names in input order.
    ///
    /// The canonical name of a record is its normalized form.
    pub fn build<S: AsRef<str>>(reference: &[S], policy: IndexPolicy) -> Result<Self, LinkError> {
        let mut idx = VariantIndex::default();
        for raw in reference {
            let canonical = normalize_name(raw.as_ref());
            for variant in generate_variants(&canonical)? {
                idx.insert(variant, &canonical, policy);
            }
        }
        if idx.collisions > 0 {
            log::debug!(
                "variant index: {} contested variants ({} policy, {} dropped as ambiguous)",
                idx.collisions,
                policy,
                idx.ambiguous.len()
            );
        }
        Ok(idx)
    }

    fn insert(&mut self, variant: String, canonical: &str, policy: IndexPolicy) {
        if self.ambiguous.contains(&variant) {
            return;
        }
        let contested = match self.map.get(&variant) {
            Some(existing) => existing != canonical,
            None => false,
        };
        if contested {
            self.collisions += 1;
        }
        match policy {
            IndexPolicy::LastWriteWins => {
                self.map.insert(variant, canonical.to_string());
            }
            IndexPolicy::KeepFirst => {
                self.map
                    .entry(variant)
                    .or_insert_with(|| canonical.to_string());
            }
            IndexPolicy::RejectAmbiguous => {
                if contested {
                    self.map.remove(&variant);
                    self.ambiguous.insert(variant);
                } else {
                    self.map.insert(variant, canonical.to_string());
                }
            }
        }
    }

    pub fn get(&self, variant: &str) -> Option<&str> {
        self.map.get(variant).map(String::as_str)
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.map.contains_key(variant)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn ambiguous_count(&self) -> usize {
        self.ambiguous.len()
    }
}
