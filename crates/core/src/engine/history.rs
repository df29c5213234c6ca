//! Execution history log.
//!
//! Bounded, newest-first record of every execution attempt, kept only
//! for observability. In-memory, not persisted across restarts.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ParameterSet;

/// One recorded execution attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub script: String,
    pub parameters: ParameterSet,
    /// Engine-level success; statement failures still count as success.
    pub success: bool,
    pub elapsed_ms: u64,
    pub row_count: u64,
}

/// Bounded newest-first log of execution attempts.
pub struct ExecutionHistory {
    records: Mutex<VecDeque<HistoryRecord>>,
    capacity: usize,
}

impl ExecutionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Prepend a record, dropping the oldest once over capacity.
    pub fn record(&self, entry: HistoryRecord) {
        let mut records = self.records.lock().expect("history mutex poisoned");
        records.push_front(entry);
        records.truncate(self.capacity);
    }

    /// Snapshot of all records, newest first.
    pub fn list(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .expect("history mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().expect("history mutex poisoned").clear();
    }
}
