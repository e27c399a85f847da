use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::decision::Priority;

/// Composite key identifying the message a claim covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimKey {
    pub chat_id: String,
    pub message_id: String,
}

impl ClaimKey {
    pub fn new(chat_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_id: message_id.into(),
        }
    }
}

impl fmt::Display for ClaimKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.message_id)
    }
}

/// Claim lifecycle states.
///
/// - Claimed: freshly granted, the bot has not started work yet
/// - Processing: the bot reported it is generating a response
/// - Completed: a response was delivered
/// - Failed: the bot gave up; the slot is free for another bot
///
/// Expiry is not a state: expired claims are deleted by the sweeper, never
/// marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Claimed,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimStatus::Claimed => write!(f, "claimed"),
            ClaimStatus::Processing => write!(f, "processing"),
            ClaimStatus::Completed => write!(f, "completed"),
            ClaimStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "claimed" => Ok(ClaimStatus::Claimed),
            "processing" => Ok(ClaimStatus::Processing),
            "completed" => Ok(ClaimStatus::Completed),
            "failed" => Ok(ClaimStatus::Failed),
            other => Err(format!("invalid claim status: '{other}'")),
        }
    }
}

/// An exclusive, TTL-bounded lease on responding to one message.
///
/// At most one live claim (claimed or processing, unexpired) may exist per
/// (chat, message) key. There is no explicit cancel: a worker that cannot
/// finish simply lets the lease expire and the sweeper reclaims it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageClaim {
    /// Time-sortable claim id (UUID v7).
    pub id: Uuid,
    pub chat_id: String,
    pub message_id: String,
    /// Bot holding the lease.
    pub bot_id: String,
    /// Priority the message classified to when the claim was granted.
    pub priority: Priority,
    pub status: ClaimStatus,
    pub claimed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MessageClaim {
    /// Create a fresh claim expiring `ttl_ms` from now.
    pub fn new(
        chat_id: impl Into<String>,
        message_id: impl Into<String>,
        bot_id: impl Into<String>,
        priority: Priority,
        ttl_ms: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            chat_id: chat_id.into(),
            message_id: message_id.into(),
            bot_id: bot_id.into(),
            priority,
            status: ClaimStatus::Claimed,
            claimed_at: now,
            expires_at: now + Duration::milliseconds(ttl_ms as i64),
        }
    }

    pub fn key(&self) -> ClaimKey {
        ClaimKey::new(self.chat_id.clone(), self.message_id.clone())
    }

    /// Whether the lease has run out as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// A live claim is one a worker is (or should be) acting on: claimed or
    /// processing, and not yet expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, ClaimStatus::Claimed | ClaimStatus::Processing)
            && !self.is_expired(now)
    }

    /// Whether this claim still blocks a new claim on the same key.
    ///
    /// Failed claims free the slot immediately; everything else blocks until
    /// expiry. A completed claim blocks too -- the message was answered, and
    /// only time releases the key.
    pub fn blocks_reclaim(&self, now: DateTime<Utc>) -> bool {
        self.status != ClaimStatus::Failed && !self.is_expired(now)
    }
}
