//! Provider budget enforcement.
//!
//! Each LLM provider gets two token buckets (requests and tokens per
//! minute) plus circuit-breaker state. The `RateLimiter` answers "may I
//! call this provider right now", and the `AdmissionQueue` parks callers
//! in FIFO order until budget frees up.

pub mod bucket;
pub mod limiter;
pub mod provider;
pub mod queue;

pub use bucket::TokenBucket;
pub use limiter::RateLimiter;
pub use provider::{ERROR_SKIP_THRESHOLD, ProviderState};
pub use queue::{AdmissionQueue, DEFAULT_DRAIN_INTERVAL, DrainerHandle, spawn_drainer};
