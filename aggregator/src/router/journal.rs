// Decision journal - bounded audit trail of routing attempts
// Keeps the most recent decisions newest-first; the oldest entry is evicted
// once capacity is reached
//
// Numan Thabit 2025 Nov

use crate::router::routes::Strategy;
use crate::venues::{ProviderStatus, QuoteRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

pub const DEFAULT_CAPACITY: usize = 100;

/// One routing attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub timestamp: DateTime<Utc>,
    pub request: QuoteRequest,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub chosen_source: Option<String>,
    /// Failure code when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub providers: Vec<ProviderStatus>,
    pub elapsed_ms: u64,
}

/// Fixed-capacity ring buffer of [`DecisionRecord`]s.
#[derive(Debug)]
pub struct DecisionJournal {
    entries: RwLock<VecDeque<DecisionRecord>>,
    capacity: usize,
}

impl Default for DecisionJournal {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DecisionJournal {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the front and evict from the back under one write guard.
    pub async fn record(&self, entry: DecisionRecord) {
        let mut entries = self.entries.write().await;
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }

    /// Up to `limit` records, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<DecisionRecord> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
