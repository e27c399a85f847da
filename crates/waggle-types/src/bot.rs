use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Smallest selection weight a bot may register with.
pub const MIN_WEIGHT: u32 = 1;

/// Largest selection weight a bot may register with.
pub const MAX_WEIGHT: u32 = 10;

/// A bot worker registered with the coordinator.
///
/// Bots are ephemeral runtime records: created on registration, mutated as
/// claims are granted and completed, removed on unregistration. They are not
/// persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    /// Caller-chosen unique identifier (e.g. "fred-bot").
    pub id: String,
    /// Freeform display name (duplicates allowed across bots).
    pub name: String,
    /// Selection weight, 1-10. Higher weights are picked proportionally
    /// more often.
    pub weight: u32,
    /// Current availability state.
    pub status: BotStatus,
    /// When this bot last completed a response (drives the cooldown check).
    pub last_response_at: Option<DateTime<Utc>>,
    /// Total responses completed since first registration. Survives
    /// re-registration of the same id.
    pub response_count: u64,
    pub registered_at: DateTime<Utc>,
}

/// Bot availability states.
///
/// - Online: in the selection pool, can take new claims
/// - Busy: holding a claim, working on a response
/// - Cooldown: administratively paused between responses
/// - Offline: not running
/// - Error: failed in a way that needs operator attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Online,
    Busy,
    Cooldown,
    Offline,
    Error,
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStatus::Online => write!(f, "online"),
            BotStatus::Busy => write!(f, "busy"),
            BotStatus::Cooldown => write!(f, "cooldown"),
            BotStatus::Offline => write!(f, "offline"),
            BotStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for BotStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(BotStatus::Online),
            "busy" => Ok(BotStatus::Busy),
            "cooldown" => Ok(BotStatus::Cooldown),
            "offline" => Ok(BotStatus::Offline),
            "error" => Ok(BotStatus::Error),
            other => Err(format!("invalid bot status: '{other}'")),
        }
    }
}

impl Default for BotStatus {
    fn default() -> Self {
        BotStatus::Online
    }
}

/// Request to register a bot. Only `id` and `name` are required -- the
/// weight defaults to the minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotRegistration {
    pub id: String,
    pub name: String,
    pub weight: Option<u32>,
}
