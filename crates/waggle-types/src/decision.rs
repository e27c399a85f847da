use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::bot::BotStatus;

/// Message priority classes.
///
/// `Low` is reserved for future use -- classification never produces it,
/// but the wire format and claim records can carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => write!(f, "urgent"),
            Priority::High => write!(f, "high"),
            Priority::Normal => write!(f, "normal"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!("invalid priority: '{other}'")),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

/// Why the coordinator granted or refused a response slot.
///
/// `Display` produces the stable reason strings callers switch on, so
/// downstream consumers never need to parse debug output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespondReason {
    /// Slot granted; the bot holds the claim.
    Claimed,
    /// Another bot already holds a blocking claim for this message.
    AlreadyClaimed,
    /// The bot completed a response too recently.
    Cooldown,
    /// Mentions are required by config and this message is not one.
    MentionRequired,
    /// The bot id is not registered.
    BotNotRegistered,
    /// The bot is registered but not online.
    BotUnavailable(BotStatus),
}

impl fmt::Display for RespondReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespondReason::Claimed => write!(f, "claimed"),
            RespondReason::AlreadyClaimed => write!(f, "already-claimed"),
            RespondReason::Cooldown => write!(f, "cooldown"),
            RespondReason::MentionRequired => write!(f, "mention-required"),
            RespondReason::BotNotRegistered => write!(f, "bot-not-registered"),
            RespondReason::BotUnavailable(status) => write!(f, "bot-status-{status}"),
        }
    }
}

/// Outcome of one `should_respond` arbitration pass.
///
/// Refusals are ordinary values, not errors: losing a claim race or sitting
/// in cooldown is expected operation.
#[derive(Debug, Clone)]
pub struct RespondDecision {
    pub respond: bool,
    pub reason: RespondReason,
    /// Set when arbitration reached classification; `None` when an earlier
    /// check short-circuited first.
    pub priority: Option<Priority>,
}

impl RespondDecision {
    /// The bot won the claim and should respond.
    pub fn granted(priority: Priority) -> Self {
        Self {
            respond: true,
            reason: RespondReason::Claimed,
            priority: Some(priority),
        }
    }

    /// Refused before classification ran.
    pub fn refused(reason: RespondReason) -> Self {
        Self {
            respond: false,
            reason,
            priority: None,
        }
    }

    /// Refused after classification ran (e.g. the claim race was lost).
    pub fn refused_with_priority(reason: RespondReason, priority: Priority) -> Self {
        Self {
            respond: false,
            reason,
            priority: Some(priority),
        }
    }
}
