//! Aggregate response statistics.
//!
//! `CoordinatorStats` keeps lock-free counters for completed and failed
//! responses. The running average is stored as a latency sum plus a count,
//! so concurrent completions never lose updates.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Point-in-time view of the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub total_responses: u64,
    pub total_failures: u64,
    pub average_response_time_ms: f64,
    pub responses_by_bot: HashMap<String, u64>,
}

/// Shared response counters. Cloning produces a view of the same counters.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorStats {
    total_responses: Arc<AtomicU64>,
    total_failures: Arc<AtomicU64>,
    response_time_total_ms: Arc<AtomicU64>,
    responses_by_bot: Arc<DashMap<String, u64>>,
}

impl CoordinatorStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed response and its latency.
    pub fn record_response(&self, bot_id: &str, response_time_ms: u64) {
        self.total_responses.fetch_add(1, Ordering::SeqCst);
        self.response_time_total_ms
            .fetch_add(response_time_ms, Ordering::SeqCst);
        *self.responses_by_bot.entry(bot_id.to_string()).or_insert(0) += 1;
    }

    /// Record a failed response.
    pub fn record_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::SeqCst);
    }

    /// Snapshot the counters.
    ///
    /// The sum and count are read independently, so a snapshot racing a
    /// completion may lag it by one sample.
    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total_responses.load(Ordering::SeqCst);
        let time_total = self.response_time_total_ms.load(Ordering::SeqCst);
        let average = if total == 0 {
            0.0
        } else {
            time_total as f64 / total as f64
        };

        StatsSnapshot {
            total_responses: total,
            total_failures: self.total_failures.load(Ordering::SeqCst),
            average_response_time_ms: average,
            responses_by_bot: self
                .responses_by_bot
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}
