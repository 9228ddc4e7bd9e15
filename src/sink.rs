//! Match sinks: durable keyed stores with insert-if-absent semantics.

use std::collections::HashSet;

use crate::error::LinkError;
use crate::models::{ApproximateMatch, ExactMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The key already existed; the stored record is left untouched.
    Duplicate,
}

/// Destination for match records.
///
/// Each insert is committed on its own. A duplicate key must be reported as
/// [`InsertOutcome::Duplicate`]; any other failure is
/// [`LinkError::Persistence`].
#[allow(async_fn_in_trait)]
pub trait MatchSink {
    async fn insert_exact(&mut self, m: &ExactMatch) -> Result<InsertOutcome, LinkError>;
    async fn insert_approximate(
        &mut self,
        m: &ApproximateMatch,
    ) -> Result<InsertOutcome, LinkError>;
}

/// In-memory sink for tests and dry runs. Keeps first-inserted records in
/// insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    exact: Vec<ExactMatch>,
    exact_keys: HashSet<(String, String)>,
    approximate: Vec<ApproximateMatch>,
    approximate_keys: HashSet<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(&self) -> &[ExactMatch] {
        &self.exact
    }

    pub fn approximate(&self) -> &[ApproximateMatch] {
        &self.approximate
    }
}

impl MatchSink for MemorySink {
    async fn insert_exact(&mut self, m: &ExactMatch) -> Result<InsertOutcome, LinkError> {
        let key = (m.source.clone(), m.canonical.clone());
        if !self.exact_keys.insert(key) {
            return Ok(InsertOutcome::Duplicate);
        }
        self.exact.push(m.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn insert_approximate(
        &mut self,
        m: &ApproximateMatch,
    ) -> Result<InsertOutcome, LinkError> {
        let key = (m.source.clone(), m.candidate.clone());
        if !self.approximate_keys.insert(key) {
            return Ok(InsertOutcome::Duplicate);
        }
        self.approximate.push(m.clone());
        Ok(InsertOutcome::Inserted)
    }
}
