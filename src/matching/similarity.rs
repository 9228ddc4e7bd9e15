//! Similarity scorers for the approximate join.
//!
//! Scores are integers in `0..=100`. Both built-in scorers are
//! token-order-insensitive: tokens are sorted before comparison.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Black-box similarity oracle.
pub trait SimilarityScorer: Sync {
    fn score(&self, a: &str, b: &str) -> u8;

    /// Cheap upper bound on `score(a, b)`, if the scorer has one.
    ///
    /// Must never be below the real score: the approximate matcher skips a
    /// pair when the bound is under the acceptance threshold.
    fn upper_bound(&self, _a: &str, _b: &str) -> Option<u8> {
        None
    }
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> u8 + Sync,
{
    fn score(&self, a: &str, b: &str) -> u8 {
        self(a, b)
    }
}

/// Indel similarity of the token-sorted strings:
/// `round(100 * 2 * lcs / (len_a + len_b))`, measured in chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortRatio;

impl SimilarityScorer for TokenSortRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        let sa: Vec<char> = sorted_tokens(a).chars().collect();
        let sb: Vec<char> = sorted_tokens(b).chars().collect();
        let total = sa.len() + sb.len();
        if total == 0 {
            return 0;
        }
        let lcs = lcs_len(&sa, &sb);
        pct(2 * lcs, total)
    }

    fn upper_bound(&self, a: &str, b: &str) -> Option<u8> {
        let la = sorted_tokens(a).chars().count();
        let lb = sorted_tokens(b).chars().count();
        let total = la + lb;
        if total == 0 {
            return Some(0);
        }
        Some(pct(2 * la.min(lb), total))
    }
}

/// Jaro-Winkler of the token-sorted strings, scaled to 0..=100.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSortJaroWinkler;

impl SimilarityScorer for TokenSortJaroWinkler {
    fn score(&self, a: &str, b: &str) -> u8 {
        let sa = sorted_tokens(a);
        let sb = sorted_tokens(b);
        if sa.is_empty() || sb.is_empty() {
            return 0;
        }
        (jaro_winkler(&sa, &sb) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Scorer selection exposed through configuration. Dispatches to the
/// matching built-in scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    TokenSort,
    TokenSortJaroWinkler,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenSort => "token_sort",
            Self::TokenSortJaroWinkler => "token_sort_jaro_winkler",
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SimilarityScorer for ScorerKind {
    fn score(&self, a: &str, b: &str) -> u8 {
        match self {
            Self::TokenSort => TokenSortRatio.score(a, b),
            Self::TokenSortJaroWinkler => TokenSortJaroWinkler.score(a, b),
        }
    }

    fn upper_bound(&self, a: &str, b: &str) -> Option<u8> {
        match self {
            Self::TokenSort => TokenSortRatio.upper_bound(a, b),
            Self::TokenSortJaroWinkler => TokenSortJaroWinkler.upper_bound(a, b),
        }
    }
}

impl std::str::FromStr for ScorerKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token_sort" => Ok(Self::TokenSort),
            "token_sort_jaro_winkler" | "jaro_winkler" => Ok(Self::TokenSortJaroWinkler),
            other => Err(format!("unknown scorer: {}", other)),
        }
    }
}

/// Lower-case, replace non-alphanumerics with spaces, sort the tokens and
/// join them with single spaces.
pub fn sorted_tokens(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[inline]
fn pct(num: usize, den: usize) -> u8 {
    ((num as f64 / den as f64) * 100.0).round() as u8
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}
