//! Configuration types for the Waggle daemon.
//!
//! `WaggleConfig` represents the top-level `waggle.toml` that controls claim
//! arbitration tuning, provider rate limits, and the HTTP listener. Every
//! field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::provider::Provider;

/// Top-level configuration for the Waggle sidecar.
///
/// Loaded from `~/.config/waggle/waggle.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaggleConfig {
    #[serde(default)]
    pub coordination: CoordinationConfig,

    #[serde(default)]
    pub ratelimit: RateLimitConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl WaggleConfig {
    /// Reject configurations the daemon cannot run with.
    ///
    /// Zero TTLs, a zero per-message bot cap, and zero provider limits all
    /// produce arbitration that can never grant anything; refusing to start
    /// beats running silently wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coordination.claim_ttl_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "coordination.claim_ttl_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.coordination.processing_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "coordination.processing_timeout_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.coordination.max_bots_per_message == 0 {
            return Err(ConfigError::Invalid {
                field: "coordination.max_bots_per_message".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for provider in &self.ratelimit.providers {
            if provider.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: "ratelimit.providers.name".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            if !seen.insert(provider.name.clone()) {
                return Err(ConfigError::Invalid {
                    field: "ratelimit.providers".to_string(),
                    message: format!("duplicate provider name '{}'", provider.name),
                });
            }
            if provider.requests_per_minute == 0 || provider.tokens_per_minute == 0 {
                return Err(ConfigError::Invalid {
                    field: format!("ratelimit.providers.{}", provider.name),
                    message: "per-minute limits must be positive".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Tuning knobs for claim arbitration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// How long a fresh claim lives before the sweeper may reclaim it.
    #[serde(default = "default_claim_ttl_ms")]
    pub claim_ttl_ms: u64,

    /// Minimum quiet period per bot between completed responses.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// Lease extension granted when a bot reports it started processing.
    #[serde(default = "default_processing_timeout_ms")]
    pub processing_timeout_ms: u64,

    /// When true, bots only respond to messages that mention them.
    #[serde(default)]
    pub require_mention: bool,

    /// When true, up to `max_bots_per_message` bots may answer one message.
    #[serde(default)]
    pub allow_multiple_responses: bool,

    /// Cap on concurrent claims per message. Only consulted when
    /// `allow_multiple_responses` is set.
    #[serde(default = "default_max_bots_per_message")]
    pub max_bots_per_message: u32,

    /// Substrings (matched case-insensitively) that classify a message as
    /// urgent.
    #[serde(default = "default_urgent_keywords")]
    pub urgent_keywords: Vec<String>,

    /// Substrings (matched case-insensitively) that classify a message as
    /// high priority.
    #[serde(default = "default_high_priority_keywords")]
    pub high_priority_keywords: Vec<String>,
}

fn default_claim_ttl_ms() -> u64 {
    30_000
}

fn default_cooldown_ms() -> u64 {
    5_000
}

fn default_processing_timeout_ms() -> u64 {
    60_000
}

fn default_max_bots_per_message() -> u32 {
    1
}

fn default_urgent_keywords() -> Vec<String> {
    ["urgent", "emergency", "asap", "critical"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_high_priority_keywords() -> Vec<String> {
    ["?", "what", "how", "why", "when", "where", "who", "help", "please"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CoordinationConfig {
    fn default() -> Self {
        Self {
            claim_ttl_ms: default_claim_ttl_ms(),
            cooldown_ms: default_cooldown_ms(),
            processing_timeout_ms: default_processing_timeout_ms(),
            require_mention: false,
            allow_multiple_responses: false,
            max_bots_per_message: default_max_bots_per_message(),
            urgent_keywords: default_urgent_keywords(),
            high_priority_keywords: default_high_priority_keywords(),
        }
    }
}

/// Providers to register with the rate limiter at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub providers: Vec<Provider>,
}

/// HTTP sidecar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the HTTP sidecar.
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:7733".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}
