//! Run summary: counts and timings of one linkage run.

use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub source_total: usize,
    pub reference_total: usize,
    pub source_blank: usize,
    pub reference_blank: usize,
    pub index_policy: String,
    pub index_variants: usize,
    pub index_collisions: usize,
    pub index_ambiguous: usize,
    pub exact_emitted: usize,
    pub exact_inserted: usize,
    pub exact_duplicates: usize,
    pub scorer: String,
    pub threshold: u8,
    pub pairs_total: usize,
    pub pairs_pruned: usize,
    pub approximate_emitted: usize,
    pub approximate_inserted: usize,
    pub approximate_duplicates: usize,
    pub index_time: Duration,
    pub exact_time: Duration,
    pub approximate_time: Duration,
    pub persist_time: Duration,
    pub started_utc: DateTime<Utc>,
    pub ended_utc: DateTime<Utc>,
}

impl Default for RunSummary {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            source_total: 0,
            reference_total: 0,
            source_blank: 0,
            reference_blank: 0,
            index_policy: String::new(),
            index_variants: 0,
            index_collisions: 0,
            index_ambiguous: 0,
            exact_emitted: 0,
            exact_inserted: 0,
            exact_duplicates: 0,
            scorer: String::new(),
            threshold: 0,
            pairs_total: 0,
            pairs_pruned: 0,
            approximate_emitted: 0,
            approximate_inserted: 0,
            approximate_duplicates: 0,
            index_time: Duration::ZERO,
            exact_time: Duration::ZERO,
            approximate_time: Duration::ZERO,
            persist_time: Duration::ZERO,
            started_utc: now,
            ended_utc: now,
        }
    }
}

impl RunSummary {
    pub fn started() -> Self {
        Self::default()
    }

    pub fn finish(&mut self) {
        self.ended_utc = Utc::now();
    }

    /// Key/value rows, in report order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Started (UTC)", self.started_utc.to_rfc3339()),
            ("Ended (UTC)", self.ended_utc.to_rfc3339()),
            ("Source names", self.source_total.to_string()),
            ("Source names skipped (blank)", self.source_blank.to_string()),
            ("Reference names", self.reference_total.to_string()),
            ("Reference names skipped (blank)", self.reference_blank.to_string()),
            ("Index policy", self.index_policy.clone()),
            ("Index variants", self.index_variants.to_string()),
            ("Index collisions", self.index_collisions.to_string()),
            ("Index ambiguous variants", self.index_ambiguous.to_string()),
            ("Exact matches", self.exact_emitted.to_string()),
            ("Exact inserted", self.exact_inserted.to_string()),
            ("Exact duplicates", self.exact_duplicates.to_string()),
            ("Scorer", self.scorer.clone()),
            ("Threshold", self.threshold.to_string()),
            ("Pairs considered", self.pairs_total.to_string()),
            ("Pairs pruned", self.pairs_pruned.to_string()),
            ("Approximate matches", self.approximate_emitted.to_string()),
            ("Approximate inserted", self.approximate_inserted.to_string()),
            ("Approximate duplicates", self.approximate_duplicates.to_string()),
            ("Index time (ms)", self.index_time.as_millis().to_string()),
            ("Exact time (ms)", self.exact_time.as_millis().to_string()),
            ("Approximate time (ms)", self.approximate_time.as_millis().to_string()),
            ("Persist time (ms)", self.persist_time.as_millis().to_string()),
        ]
    }

    pub fn log(&self) {
        log::info!(
            "Summary: source={} reference={} | exact={} (inserted {}, dup {}) | approximate={} (inserted {}, dup {}) | pairs={} pruned={}",
            self.source_total,
            self.reference_total,
            self.exact_emitted,
            self.exact_inserted,
            self.exact_duplicates,
            self.approximate_emitted,
            self.approximate_inserted,
            self.approximate_duplicates,
            self.pairs_total,
            self.pairs_pruned
        );
        log::info!(
            "Timings: index {:?}, exact {:?}, approximate {:?}, persist {:?}",
            self.index_time,
            self.exact_time,
            self.approximate_time,
            self.persist_time
        );
    }
}
