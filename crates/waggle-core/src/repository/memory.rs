//! In-memory repository implementations.
//!
//! `MemoryBotRepository` keeps the roster in registration order behind an
//! async `RwLock`. `MemoryClaimRepository` shards claims by `ClaimKey` in a
//! `DashMap`: the entry guard serializes racing attempts for one message
//! while attempts on other messages proceed in parallel.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use waggle_types::bot::Bot;
use waggle_types::claim::{ClaimKey, ClaimStatus, MessageClaim};
use waggle_types::error::RepositoryError;

use super::bot::BotRepository;
use super::claim::{ClaimAttempt, ClaimRepository};

/// Bot roster held in memory, in registration order.
#[derive(Debug, Default)]
pub struct MemoryBotRepository {
    bots: RwLock<Vec<Bot>>,
}

impl MemoryBotRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BotRepository for MemoryBotRepository {
    async fn upsert(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        let mut bots = self.bots.write().await;
        match bots.iter_mut().find(|b| b.id == bot.id) {
            Some(slot) => *slot = bot.clone(),
            None => bots.push(bot.clone()),
        }
        Ok(bot.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Bot>, RepositoryError> {
        let bots = self.bots.read().await;
        Ok(bots.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Bot>, RepositoryError> {
        Ok(self.bots.read().await.clone())
    }

    async fn update(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        let mut bots = self.bots.write().await;
        match bots.iter_mut().find(|b| b.id == bot.id) {
            Some(slot) => {
                *slot = bot.clone();
                Ok(bot.clone())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn remove(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut bots = self.bots.write().await;
        let before = bots.len();
        bots.retain(|b| b.id != id);
        Ok(bots.len() < before)
    }
}

/// Message claims sharded by `ClaimKey`.
///
/// Each key maps to the claims currently held on that message (usually one;
/// more when multiple responses per message are allowed).
#[derive(Debug, Default)]
pub struct MemoryClaimRepository {
    claims: DashMap<ClaimKey, Vec<MessageClaim>>,
}

impl MemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimRepository for MemoryClaimRepository {
    async fn try_claim(
        &self,
        claim: MessageClaim,
        max_live: usize,
        now: DateTime<Utc>,
    ) -> Result<ClaimAttempt, RepositoryError> {
        // The entry guard holds the shard lock for this key until we return,
        // so racing attempts on the same message observe each other.
        let mut slot = self.claims.entry(claim.key()).or_default();

        // Failed and expired claims no longer block; drop them here so the
        // slot can be rewon before the sweeper gets to it.
        slot.retain(|c| c.blocks_reclaim(now));

        if slot.len() >= max_live {
            if let Some(blocking) = slot.first() {
                return Ok(ClaimAttempt::Conflict(blocking.clone()));
            }
        }

        slot.push(claim.clone());
        Ok(ClaimAttempt::Granted(claim))
    }

    async fn set_status(
        &self,
        key: &ClaimKey,
        bot_id: &str,
        status: ClaimStatus,
        new_expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<MessageClaim>, RepositoryError> {
        let Some(mut slot) = self.claims.get_mut(key) else {
            return Ok(None);
        };

        let Some(claim) = slot.iter_mut().find(|c| {
            c.bot_id == bot_id
                && matches!(c.status, ClaimStatus::Claimed | ClaimStatus::Processing)
        }) else {
            return Ok(None);
        };

        claim.status = status;
        if let Some(expires_at) = new_expires_at {
            claim.expires_at = expires_at;
        }
        Ok(Some(claim.clone()))
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut removed = 0;
        self.claims.retain(|_, slot| {
            let before = slot.len();
            slot.retain(|c| !c.is_expired(now));
            removed += before - slot.len();
            !slot.is_empty()
        });
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.claims.iter().map(|slot| slot.value().len()).sum())
    }
}
