//! Message claim repository trait definition.

use chrono::{DateTime, Utc};
use waggle_types::claim::{ClaimKey, ClaimStatus, MessageClaim};
use waggle_types::error::RepositoryError;

/// Outcome of a claim attempt.
#[derive(Debug, Clone)]
pub enum ClaimAttempt {
    /// The claim was recorded; the caller owns the message slot.
    Granted(MessageClaim),
    /// A live claim already holds the slot.
    Conflict(MessageClaim),
}

/// Repository trait for message claims.
///
/// `try_claim` must be linearizable per `ClaimKey`: when several bots race
/// for the same message, exactly one wins (up to `max_live`). Implementations
/// must serialize attempts per key only, never through a map-wide lock --
/// claims on unrelated messages proceed in parallel.
pub trait ClaimRepository: Send + Sync {
    /// Atomically record `claim` unless its slot already holds `max_live`
    /// blocking claims. Failed and expired claims do not block; the attempt
    /// prunes them from the slot.
    fn try_claim(
        &self,
        claim: MessageClaim,
        max_live: usize,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<ClaimAttempt, RepositoryError>> + Send;

    /// Transition the open (claimed or processing) claim held by `bot_id` on
    /// `key` to `status`, optionally re-arming its expiry. Returns the
    /// updated claim, or `None` when the bot holds no open claim there.
    fn set_status(
        &self,
        key: &ClaimKey,
        bot_id: &str,
        status: ClaimStatus,
        new_expires_at: Option<DateTime<Utc>>,
    ) -> impl std::future::Future<Output = Result<Option<MessageClaim>, RepositoryError>> + Send;

    /// Delete every claim whose expiry has passed, regardless of status.
    /// Returns the number of claims removed.
    fn sweep_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<usize, RepositoryError>> + Send;

    /// Number of claims currently held, across all statuses.
    fn count(
        &self,
    ) -> impl std::future::Future<Output = Result<usize, RepositoryError>> + Send;
}
