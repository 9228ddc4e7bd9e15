use serde::{Deserialize, Serialize};

/// Pair found by the exact variant join.
///
/// `source` is the normalized source name, `canonical` the normalized
/// reference name that owns `shared_variant`. Unique on the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExactMatch {
    pub source: String,
    pub canonical: String,
    pub shared_variant: String,
}

impl ExactMatch {
    pub fn key(&self) -> (&str, &str) {
        (&self.source, &self.canonical)
    }
}

/// Triple found by the approximate join. Names are kept as loaded.
/// Unique on `(source, candidate)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproximateMatch {
    pub source: String,
    pub candidate: String,
    pub score: u8,
}

impl ApproximateMatch {
    pub fn key(&self) -> (&str, &str) {
        (&self.source, &self.candidate)
    }
}

/// Both match lists of one run, in emission order.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    pub exact: Vec<ExactMatch>,
    pub approximate: Vec<ApproximateMatch>,
}
