//! Alert types for the Waggle alert bus.
//!
//! `Alert` is the unified event type broadcast when the coordinator or rate
//! limiter hits a condition an operator should know about. All variants are
//! Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

/// Operational alerts emitted by the coordinator and rate limiter.
///
/// Consumed by subscribers (log forwarder, dashboards, paging). Publishing
/// with no subscribers is a no-op, so hot paths never block on alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Alert {
    /// A provider's circuit opened after a rate-limit error.
    CircuitOpened {
        provider: String,
        /// How long the provider is excluded from selection.
        disabled_for_ms: u64,
        consecutive_errors: u32,
    },

    /// A previously excluded provider served a successful call again.
    ProviderRecovered { provider: String },

    /// A selection pass found no eligible bot.
    BotPoolExhausted {
        /// How many bots were registered at the time (eligible or not).
        registered_bots: usize,
    },
}
