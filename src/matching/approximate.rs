//! Nested-loop similarity join.
//!
//! Every source name is scored against every reference name, so cost is
//! |A| x |B| scorer calls. The optional prefilter only skips pairs whose
//! scorer-provided upper bound is already below the threshold; the emitted
//! set is identical with or without it.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matching::similarity::SimilarityScorer;
use crate::models::ApproximateMatch;

/// Minimum accepted similarity score.
pub const DEFAULT_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApproximateOptions {
    pub threshold: u8,
    /// Skip pairs whose score upper bound is under the threshold.
    pub prefilter: bool,
    /// Score source rows on the rayon pool. Output order is unchanged.
    pub parallel: bool,
}

impl Default for ApproximateOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            prefilter: true,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproximateStats {
    pub pairs_total: usize,
    pub pairs_pruned: usize,
    pub pairs_scored: usize,
}

impl ApproximateStats {
    fn merge(mut self, other: ApproximateStats) -> Self {
        self.pairs_total += other.pairs_total;
        self.pairs_pruned += other.pairs_pruned;
        self.pairs_scored += other.pairs_scored;
        self
    }
}

/// Plain quadratic join: every pair is scored, pairs with
/// `score >= threshold` are emitted in (source, reference) order.
pub fn approximate_match<S, T, F>(
    source: &[S],
    reference: &[T],
    scorer: &F,
    threshold: u8,
) -> Vec<ApproximateMatch>
where
    S: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
    F: SimilarityScorer + ?Sized,
{
    let opts = ApproximateOptions {
        threshold,
        prefilter: false,
        parallel: false,
    };
    approximate_match_with(source, reference, scorer, opts).0
}

pub fn approximate_match_with<S, T, F>(
    source: &[S],
    reference: &[T],
    scorer: &F,
    opts: ApproximateOptions,
) -> (Vec<ApproximateMatch>, ApproximateStats)
where
    S: AsRef<str> + Sync,
    T: AsRef<str> + Sync,
    F: SimilarityScorer + ?Sized,
{
    let rows: Vec<(Vec<ApproximateMatch>, ApproximateStats)> = if opts.parallel {
        source
            .par_iter()
            .map(|a| match_row(a.as_ref(), reference, scorer, opts))
            .collect()
    } else {
        source
            .iter()
            .map(|a| match_row(a.as_ref(), reference, scorer, opts))
            .collect()
    };

    let mut out = Vec::new();
    let mut stats = ApproximateStats::default();
    for (found, row_stats) in rows {
        out.extend(found);
        stats = stats.merge(row_stats);
    }
    (out, stats)
}

fn match_row<T, F>(
    a: &str,
    reference: &[T],
    scorer: &F,
    opts: ApproximateOptions,
) -> (Vec<ApproximateMatch>, ApproximateStats)
where
    T: AsRef<str>,
    F: SimilarityScorer + ?Sized,
{
    let mut found = Vec::new();
    let mut stats = ApproximateStats::default();
    for b in reference {
        let b = b.as_ref();
        stats.pairs_total += 1;
        if opts.prefilter {
            if let Some(ub) = scorer.upper_bound(a, b) {
                if ub < opts.threshold {
                    stats.pairs_pruned += 1;
                    continue;
                }
            }
        }
        stats.pairs_scored += 1;
        let score = scorer.score(a, b);
        if score >= opts.threshold {
            found.push(ApproximateMatch {
                source: a.to_string(),
                candidate: b.to_string(),
                score,
            });
        }
    }
    (found, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::similarity::{TokenSortJaroWinkler, TokenSortRatio};

    const SOURCE: &[&str] = &[
        "John Smith",
        "Jon Smyth",
        "Smith, J.",
        "Mr. John Smith",
        "Anna-Maria de la Cruz",
        "Ann Cruz",
        "Jan Novak",
        "X",
    ];
    const REFERENCE: &[&str] = &[
        "Smith John",
        "John Smith",
        "Maria de la Cruz",
        "Ing. Jan Novák",
        "Jane Novak",
        "Johnny Smithers",
        "Q",
    ];

    #[test]
    fn threshold_is_inclusive() {
        let scorer = |a: &str, _b: &str| if a == "at" { 70u8 } else { 69u8 };
        let r = approximate_match(&["at", "below"], &["ref"], &scorer, DEFAULT_THRESHOLD);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].source, "at");
        assert_eq!(r[0].score, 70);
    }

    #[test]
    fn oracle_score_is_kept() {
        let scorer = |a: &str, b: &str| {
            if a == "Jon Smyth" && b == "John Smith" {
                72u8
            } else {
                0
            }
        };
        let r = approximate_match(&["Jon Smyth"], &["John Smith"], &scorer, 70);
        assert_eq!(
            r,
            vec![ApproximateMatch {
                source: "Jon Smyth".into(),
                candidate: "John Smith".into(),
                score: 72,
            }]
        );
    }

    #[test]
    fn names_are_kept_as_loaded() {
        let r = approximate_match(&["SMITH,  John"], &["john smith"], &TokenSortRatio, 70);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].source, "SMITH,  John");
        assert_eq!(r[0].score, 100);
    }

    #[test]
    fn prefilter_matches_quadratic_baseline() {
        for threshold in [0u8, 50, 70, 85, 100] {
            let baseline = approximate_match(SOURCE, REFERENCE, &TokenSortRatio, threshold);
            let opts = ApproximateOptions {
                threshold,
                prefilter: true,
                parallel: false,
            };
            let (pruned, stats) = approximate_match_with(SOURCE, REFERENCE, &TokenSortRatio, opts);
            assert_eq!(pruned, baseline, "threshold {}", threshold);
            assert_eq!(stats.pairs_total, SOURCE.len() * REFERENCE.len());
            assert_eq!(stats.pairs_total, stats.pairs_pruned + stats.pairs_scored);
        }
    }

    #[test]
    fn prefilter_prunes_length_mismatches() {
        let opts = ApproximateOptions::default();
        let (_, stats) = approximate_match_with(&["X"], &["Maria de la Cruz"], &TokenSortRatio, opts);
        assert_eq!(stats.pairs_pruned, 1);
        assert_eq!(stats.pairs_scored, 0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let seq = approximate_match(SOURCE, REFERENCE, &TokenSortJaroWinkler, 70);
        let opts = ApproximateOptions {
            threshold: 70,
            prefilter: true,
            parallel: true,
        };
        let (par, _) = approximate_match_with(SOURCE, REFERENCE, &TokenSortJaroWinkler, opts);
        assert_eq!(par, seq);
    }

    #[test]
    fn empty_inputs() {
        let none: &[&str] = &[];
        assert!(approximate_match(none, REFERENCE, &TokenSortRatio, 70).is_empty());
        assert!(approximate_match(SOURCE, none, &TokenSortRatio, 70).is_empty());
    }
}
