use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Per-minute request allowance used when a provider does not declare one.
pub const DEFAULT_REQUESTS_PER_MINUTE: u64 = 60;

/// Per-minute token allowance used when a provider does not declare one.
pub const DEFAULT_TOKENS_PER_MINUTE: u64 = 100_000;

/// An upstream LLM API provider registered with the rate limiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Unique provider name (e.g. "anthropic").
    pub name: String,
    /// Failover ordering. Lower ranks are preferred; ties go to whichever
    /// provider registered first.
    #[serde(default)]
    pub priority: u32,
    /// Requests allowed per minute.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u64,
    /// Tokens allowed per minute.
    #[serde(default = "default_tokens_per_minute")]
    pub tokens_per_minute: u64,
}

fn default_requests_per_minute() -> u64 {
    DEFAULT_REQUESTS_PER_MINUTE
}

fn default_tokens_per_minute() -> u64 {
    DEFAULT_TOKENS_PER_MINUTE
}

impl Provider {
    /// Create a provider with the default per-minute limits.
    pub fn new(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            tokens_per_minute: DEFAULT_TOKENS_PER_MINUTE,
        }
    }

    pub fn with_limits(mut self, requests_per_minute: u64, tokens_per_minute: u64) -> Self {
        self.requests_per_minute = requests_per_minute;
        self.tokens_per_minute = tokens_per_minute;
        self
    }
}

/// Read-only snapshot of one provider's runtime state.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    pub priority: u32,
    /// Whether selection would currently consider this provider.
    pub available: bool,
    /// Whole requests left in the bucket, floored.
    pub remaining_requests: u64,
    /// Whole tokens left in the bucket, floored.
    pub remaining_tokens: u64,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    /// Remaining circuit-open time, when the circuit is open.
    pub disabled_for_ms: Option<u64>,
}

/// Outcome of a `try_acquire` admission attempt.
///
/// Denials are ordinary values: running out of budget is expected operation,
/// and the wait hint tells the caller when to try again. Nothing sleeps on
/// it -- the hint is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// Budget consumed; the caller may issue the request.
    Acquired,
    /// Open circuit or insufficient budget.
    Denied {
        /// Estimated time until the request could succeed.
        wait: Duration,
    },
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, AcquireOutcome::Acquired)
    }

    /// The wait hint, when denied.
    pub fn wait(&self) -> Option<Duration> {
        match self {
            AcquireOutcome::Acquired => None,
            AcquireOutcome::Denied { wait } => Some(*wait),
        }
    }
}
