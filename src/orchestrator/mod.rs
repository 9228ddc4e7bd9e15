//! Linkage pipeline: index -> exact -> approximate -> persist.
//!
//! Every stage takes and returns plain data, so the whole run can be driven
//! against a [`crate::sink::MemorySink`] without a database.

pub mod summary;

use std::time::Instant;

use log::{error, info, warn};

use crate::config::MatchingConfig;
use crate::error::LinkError;
use crate::matching::{
    ApproximateOptions, IndexPolicy, SimilarityScorer, VariantIndex, approximate_match_with,
    exact_match,
};
use crate::models::MatchSet;
use crate::normalize::normalize_name;
use crate::sink::{InsertOutcome, MatchSink};
use summary::RunSummary;

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub index_policy: IndexPolicy,
    pub approximate: ApproximateOptions,
}

impl From<&MatchingConfig> for PipelineConfig {
    fn from(m: &MatchingConfig) -> Self {
        Self {
            index_policy: m.index_policy,
            approximate: ApproximateOptions {
                threshold: m.threshold,
                prefilter: m.prefilter,
                parallel: m.parallel,
            },
        }
    }
}

/// Remove names that normalize to nothing. Returns the kept names and the
/// number dropped.
pub fn drop_blank(names: Vec<String>, label: &str) -> (Vec<String>, usize) {
    let total = names.len();
    let kept: Vec<String> = names
        .into_iter()
        .filter(|n| !normalize_name(n).is_empty())
        .collect();
    let dropped = total - kept.len();
    if dropped > 0 {
        warn!("{}: skipped {} blank names", label, dropped);
    }
    (kept, dropped)
}

/// Build the index over `reference`, then run the exact and approximate
/// joins. Nothing is persisted.
pub fn match_collections<F>(
    source: &[String],
    reference: &[String],
    scorer: &F,
    cfg: &PipelineConfig,
    summary: &mut RunSummary,
) -> Result<MatchSet, LinkError>
where
    F: SimilarityScorer + ?Sized,
{
    summary.source_total = source.len();
    summary.reference_total = reference.len();
    summary.index_policy = cfg.index_policy.to_string();
    summary.threshold = cfg.approximate.threshold;

    let t0 = Instant::now();
    let index = VariantIndex::build(reference, cfg.index_policy)?;
    summary.index_time = t0.elapsed();
    summary.index_variants = index.len();
    summary.index_collisions = index.collisions();
    summary.index_ambiguous = index.ambiguous_count();
    info!(
        "Variant index: {} variants from {} reference names in {:?}",
        index.len(),
        reference.len(),
        summary.index_time
    );

    let t1 = Instant::now();
    let exact = exact_match(source, &index)?;
    summary.exact_time = t1.elapsed();
    summary.exact_emitted = exact.len();
    info!(
        "Exact join: {} matches for {} source names in {:?}",
        exact.len(),
        source.len(),
        summary.exact_time
    );

    let t2 = Instant::now();
    let (approximate, stats) = approximate_match_with(source, reference, scorer, cfg.approximate);
    summary.approximate_time = t2.elapsed();
    summary.approximate_emitted = approximate.len();
    summary.pairs_total = stats.pairs_total;
    summary.pairs_pruned = stats.pairs_pruned;
    info!(
        "Approximate join: {} matches (score >= {}) from {} pairs ({} pruned) in {:?}",
        approximate.len(),
        cfg.approximate.threshold,
        stats.pairs_total,
        stats.pairs_pruned,
        summary.approximate_time
    );

    Ok(MatchSet { exact, approximate })
}

/// Write every match in emission order, exact first. The first failure
/// aborts; records written before it stay written.
pub async fn persist<K: MatchSink>(
    sink: &mut K,
    set: &MatchSet,
    summary: &mut RunSummary,
) -> Result<(), LinkError> {
    let t0 = Instant::now();
    for m in &set.exact {
        match sink.insert_exact(m).await {
            Ok(InsertOutcome::Inserted) => summary.exact_inserted += 1,
            Ok(InsertOutcome::Duplicate) => summary.exact_duplicates += 1,
            Err(e) => {
                error!(
                    "Persisting exact match ({}, {}) failed after {} inserts: {}",
                    m.source, m.canonical, summary.exact_inserted, e
                );
                return Err(e);
            }
        }
    }
    for m in &set.approximate {
        match sink.insert_approximate(m).await {
            Ok(InsertOutcome::Inserted) => summary.approximate_inserted += 1,
            Ok(InsertOutcome::Duplicate) => summary.approximate_duplicates += 1,
            Err(e) => {
                error!(
                    "Persisting approximate match ({}, {}) failed after {} inserts: {}",
                    m.source, m.candidate, summary.approximate_inserted, e
                );
                return Err(e);
            }
        }
    }
    summary.persist_time = t0.elapsed();
    Ok(())
}

/// Full run over already-loaded collections.
pub async fn run_pipeline<F, K>(
    source: Vec<String>,
    reference: Vec<String>,
    scorer: &F,
    sink: &mut K,
    cfg: &PipelineConfig,
) -> Result<(MatchSet, RunSummary), LinkError>
where
    F: SimilarityScorer + ?Sized,
    K: MatchSink,
{
    let mut summary = RunSummary::started();
    let (source, source_blank) = drop_blank(source, "source");
    let (reference, reference_blank) = drop_blank(reference, "reference");
    summary.source_blank = source_blank;
    summary.reference_blank = reference_blank;

    let set = match_collections(&source, &reference, scorer, cfg, &mut summary)?;
    persist(sink, &set, &mut summary).await?;
    summary.finish();
    Ok((set, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::TokenSortRatio;
    use crate::models::{ApproximateMatch, ExactMatch};
    use crate::sink::MemorySink;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn reversed_name_links_exactly() {
        let mut sink = MemorySink::new();
        let (set, summary) = run_pipeline(
            names(&["John Smith"]),
            names(&["Smith John"]),
            &TokenSortRatio,
            &mut sink,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(set.exact.len(), 1);
        assert_eq!(sink.exact().len(), 1);
        assert_eq!(sink.exact()[0].source, "john smith");
        assert_eq!(sink.exact()[0].canonical, "smith john");
        assert_eq!(summary.exact_inserted, 1);
        // token sort makes the reordered pair a perfect approximate match too
        assert_eq!(sink.approximate().len(), 1);
        assert_eq!(sink.approximate()[0].score, 100);
    }

    #[tokio::test]
    async fn misspelling_links_only_approximately() {
        let oracle = |a: &str, b: &str| {
            if a == "Jon Smyth" && b == "John Smith" {
                72u8
            } else {
                0
            }
        };
        let mut sink = MemorySink::new();
        let (set, _) = run_pipeline(
            names(&["Jon Smyth"]),
            names(&["John Smith"]),
            &oracle,
            &mut sink,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();
        assert!(set.exact.is_empty());
        assert!(sink.exact().is_empty());
        assert_eq!(
            sink.approximate(),
            &[ApproximateMatch {
                source: "Jon Smyth".into(),
                candidate: "John Smith".into(),
                score: 72,
            }]
        );
    }

    #[tokio::test]
    async fn duplicate_source_rows_persist_once() {
        let mut sink = MemorySink::new();
        let (set, summary) = run_pipeline(
            names(&["John Smith", "john  smith", "JOHN SMITH"]),
            names(&["Smith, John"]),
            &TokenSortRatio,
            &mut sink,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(set.exact.len(), 3);
        assert_eq!(sink.exact().len(), 1);
        assert_eq!(summary.exact_inserted, 1);
        assert_eq!(summary.exact_duplicates, 2);
        // approximate names are kept as loaded, so these are distinct keys
        assert_eq!(sink.approximate().len(), 3);
    }

    #[tokio::test]
    async fn blank_rows_are_skipped() {
        let mut sink = MemorySink::new();
        let (_, summary) = run_pipeline(
            names(&["", "John Smith", " , "]),
            names(&["John Smith", "   "]),
            &TokenSortRatio,
            &mut sink,
            &PipelineConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(summary.source_blank, 2);
        assert_eq!(summary.reference_blank, 1);
        assert_eq!(summary.source_total, 1);
        assert_eq!(sink.exact().len(), 1);
    }

    struct FailingSink {
        inner: MemorySink,
        writes_left: usize,
    }

    impl MatchSink for FailingSink {
        async fn insert_exact(&mut self, m: &ExactMatch) -> Result<InsertOutcome, LinkError> {
            if self.writes_left == 0 {
                return Err(LinkError::Persistence("connection lost".into()));
            }
            self.writes_left -= 1;
            self.inner.insert_exact(m).await
        }

        async fn insert_approximate(
            &mut self,
            m: &ApproximateMatch,
        ) -> Result<InsertOutcome, LinkError> {
            if self.writes_left == 0 {
                return Err(LinkError::Persistence("connection lost".into()));
            }
            self.writes_left -= 1;
            self.inner.insert_approximate(m).await
        }
    }

    #[tokio::test]
    async fn write_failure_aborts_and_keeps_prior_inserts() {
        let mut sink = FailingSink {
            inner: MemorySink::new(),
            writes_left: 1,
        };
        let r = run_pipeline(
            names(&["John Smith", "Anna Lee"]),
            names(&["Smith John", "Lee Anna"]),
            &TokenSortRatio,
            &mut sink,
            &PipelineConfig::default(),
        )
        .await;
        assert!(matches!(r, Err(LinkError::Persistence(_))));
        assert_eq!(sink.inner.exact().len(), 1);
        assert!(sink.inner.approximate().is_empty());
    }

    #[test]
    fn stages_without_a_sink() {
        let mut summary = RunSummary::started();
        let cfg = PipelineConfig {
            index_policy: IndexPolicy::KeepFirst,
            approximate: ApproximateOptions {
                threshold: 90,
                ..Default::default()
            },
        };
        let set = match_collections(
            &names(&["Mrs. Jane Doe", "Bob Stone"]),
            &names(&["Doe Jane", "Robert Stone"]),
            &TokenSortRatio,
            &cfg,
            &mut summary,
        )
        .unwrap();
        assert_eq!(set.exact.len(), 1);
        assert_eq!(set.exact[0].canonical, "doe jane");
        assert_eq!(summary.pairs_total, 4);
        assert_eq!(summary.threshold, 90);
        assert_eq!(summary.index_policy, "keep_first");
    }
}
