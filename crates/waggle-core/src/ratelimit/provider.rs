//! Per-provider budget and circuit state.

use std::time::{Duration, Instant};

use waggle_types::provider::{Provider, ProviderStatus};

use super::bucket::TokenBucket;

/// Consecutive errors after which selection skips a provider.
pub const ERROR_SKIP_THRESHOLD: u32 = 3;

/// Circuit-open window for the first rate-limit error.
const BACKOFF_BASE_MS: u64 = 60_000;

/// Longest the circuit stays open regardless of error count.
const BACKOFF_CAP_MS: u64 = 300_000;

/// Budget buckets and health for one registered provider.
#[derive(Debug, Clone)]
pub struct ProviderState {
    pub provider: Provider,
    /// Registration sequence; breaks priority ties.
    pub seq: u64,
    pub requests: TokenBucket,
    pub tokens: TokenBucket,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    pub disabled_until: Option<Instant>,
}

impl ProviderState {
    pub fn new(provider: Provider, seq: u64, now: Instant) -> Self {
        let requests = TokenBucket::per_minute(provider.requests_per_minute, now);
        let tokens = TokenBucket::per_minute(provider.tokens_per_minute, now);
        Self {
            provider,
            seq,
            requests,
            tokens,
            consecutive_errors: 0,
            last_error: None,
            disabled_until: None,
        }
    }

    /// How much longer the circuit stays open. `None` when closed.
    pub fn disabled_for(&self, now: Instant) -> Option<Duration> {
        let until = self.disabled_until?;
        if now >= until { None } else { Some(until - now) }
    }

    pub fn is_circuit_open(&self, now: Instant) -> bool {
        self.disabled_for(now).is_some()
    }

    /// Whether selection may route to this provider.
    pub fn is_usable(&self, now: Instant) -> bool {
        !self.is_circuit_open(now) && self.consecutive_errors < ERROR_SKIP_THRESHOLD
    }

    /// Clear error state after a successful call. An open circuit is left
    /// to run out on its own. Returns whether the provider had errors to
    /// clear, for recovery alerts.
    pub fn record_success(&mut self) -> bool {
        let had_errors = self.consecutive_errors > 0;
        self.consecutive_errors = 0;
        self.last_error = None;
        had_errors
    }

    /// Count an error; a rate-limit error opens the circuit with
    /// exponential backoff. Returns the open window when one was started.
    pub fn record_error(
        &mut self,
        error: &str,
        is_rate_limit: bool,
        now: Instant,
    ) -> Option<Duration> {
        self.consecutive_errors += 1;
        self.last_error = Some(error.to_string());

        if !is_rate_limit {
            return None;
        }

        // 60s, 120s, 240s, then capped at 300s. The shift is clamped so
        // the doubling cannot overflow.
        let exp = self.consecutive_errors.saturating_sub(1).min(16);
        let backoff_ms = BACKOFF_BASE_MS.saturating_mul(1u64 << exp).min(BACKOFF_CAP_MS);
        let window = Duration::from_millis(backoff_ms);
        self.disabled_until = Some(now + window);
        Some(window)
    }

    /// Snapshot for status listings. Refills both buckets as a side effect
    /// so the remaining budgets account for elapsed time.
    pub fn snapshot(&mut self, now: Instant) -> ProviderStatus {
        self.requests.refill(now);
        self.tokens.refill(now);

        ProviderStatus {
            name: self.provider.name.clone(),
            priority: self.provider.priority,
            available: self.is_usable(now),
            remaining_requests: self.requests.remaining(),
            remaining_tokens: self.tokens.remaining(),
            consecutive_errors: self.consecutive_errors,
            last_error: self.last_error.clone(),
            disabled_for_ms: self.disabled_for(now).map(|d| d.as_millis() as u64),
        }
    }
}
