//! Claim arbitration service.
//!
//! `Coordinator` answers one question: may this bot respond to this message?
//! The decision pipeline checks registration, availability, the mention
//! gate, per-bot cooldown, classifies priority, and finally races for the
//! message claim. Each check short-circuits with a machine-readable reason.
//!
//! Bot status writes are advisory and may briefly go stale under
//! concurrency; the claim map is the sole authority for message-level
//! mutual exclusion.

use chrono::Utc;
use tracing::{debug, info, warn};
use waggle_types::alert::Alert;
use waggle_types::bot::{Bot, BotRegistration, BotStatus, MAX_WEIGHT, MIN_WEIGHT};
use waggle_types::claim::{ClaimKey, ClaimStatus, MessageClaim};
use waggle_types::config::CoordinationConfig;
use waggle_types::decision::{Priority, RespondDecision, RespondReason};
use waggle_types::error::CoordinationError;

use crate::alert::AlertBus;
use crate::repository::bot::BotRepository;
use crate::repository::claim::{ClaimAttempt, ClaimRepository};

use super::stats::{CoordinatorStats, StatsSnapshot};
use super::{priority, selection};

/// Service arbitrating which bot answers which message.
///
/// Generic over the claim and bot repositories so the arbitration logic
/// never depends on how claims are stored.
pub struct Coordinator<C: ClaimRepository, B: BotRepository> {
    config: CoordinationConfig,
    claims: C,
    bots: B,
    stats: CoordinatorStats,
    alerts: AlertBus,
}

impl<C: ClaimRepository, B: BotRepository> Coordinator<C, B> {
    pub fn new(config: CoordinationConfig, claims: C, bots: B, alerts: AlertBus) -> Self {
        Self {
            config,
            claims,
            bots,
            stats: CoordinatorStats::new(),
            alerts,
        }
    }

    pub fn config(&self) -> &CoordinationConfig {
        &self.config
    }

    /// Register a bot, or refresh an existing registration.
    ///
    /// Re-registering an id is idempotent: response history and roster
    /// position survive, while name and weight take the new values. The bot
    /// always comes back online.
    pub async fn register_bot(
        &self,
        registration: BotRegistration,
    ) -> Result<Bot, CoordinationError> {
        let id = registration.id.trim().to_string();
        if id.is_empty() {
            return Err(CoordinationError::EmptyBotId);
        }
        let weight = registration.weight.unwrap_or(MIN_WEIGHT);
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(CoordinationError::InvalidWeight(weight));
        }

        let existing = self.bots.get(&id).await?;
        let bot = match existing {
            Some(previous) => Bot {
                id,
                name: registration.name,
                weight,
                status: BotStatus::Online,
                last_response_at: previous.last_response_at,
                response_count: previous.response_count,
                registered_at: previous.registered_at,
            },
            None => Bot {
                id,
                name: registration.name,
                weight,
                status: BotStatus::Online,
                last_response_at: None,
                response_count: 0,
                registered_at: Utc::now(),
            },
        };

        let bot = self.bots.upsert(&bot).await?;
        info!(bot_id = %bot.id, weight = bot.weight, "bot registered");
        Ok(bot)
    }

    /// Remove a bot from the roster. Returns whether it was present.
    ///
    /// Claims the bot still holds are left alone; the sweeper reclaims them
    /// when their leases expire.
    pub async fn unregister_bot(&self, id: &str) -> Result<bool, CoordinationError> {
        let removed = self.bots.remove(id).await?;
        if removed {
            info!(bot_id = %id, "bot unregistered");
        }
        Ok(removed)
    }

    /// Set a bot's status directly. Returns `None` for an unknown id.
    pub async fn set_bot_status(
        &self,
        id: &str,
        status: BotStatus,
    ) -> Result<Option<Bot>, CoordinationError> {
        let Some(mut bot) = self.bots.get(id).await? else {
            return Ok(None);
        };
        bot.status = status;
        let bot = self.bots.update(&bot).await?;
        Ok(Some(bot))
    }

    /// Classify a message with this coordinator's keyword lists.
    pub fn classify_priority(&self, text: &str, is_mention: bool) -> Priority {
        priority::classify_priority(
            text,
            is_mention,
            &self.config.urgent_keywords,
            &self.config.high_priority_keywords,
        )
    }

    /// Weighted random pick among online bots not in `exclude`.
    pub async fn select_bot(&self, exclude: &[String]) -> Result<Option<Bot>, CoordinationError> {
        let bots = self.bots.list().await?;
        let selected = selection::select_weighted(&bots, exclude).cloned();
        if selected.is_none() {
            warn!(registered = bots.len(), "no eligible bot for selection");
            self.alerts.publish(Alert::BotPoolExhausted {
                registered_bots: bots.len(),
            });
        }
        Ok(selected)
    }

    /// Decide whether `bot_id` may respond to a message.
    ///
    /// Checks run in a fixed order and the first refusal wins:
    /// registration, availability, the mention gate, cooldown, then the
    /// claim race. On success the message is claimed and the bot marked
    /// busy.
    pub async fn should_respond(
        &self,
        chat_id: &str,
        message_id: &str,
        bot_id: &str,
        message_text: &str,
        is_mention: bool,
    ) -> Result<RespondDecision, CoordinationError> {
        // 1. Must be registered
        let Some(bot) = self.bots.get(bot_id).await? else {
            return Ok(RespondDecision::refused(RespondReason::BotNotRegistered));
        };

        // 2. Must be online
        if bot.status != BotStatus::Online {
            return Ok(RespondDecision::refused(RespondReason::BotUnavailable(
                bot.status,
            )));
        }

        // 3. Mention gate, when configured
        if self.config.require_mention && !is_mention {
            return Ok(RespondDecision::refused(RespondReason::MentionRequired));
        }

        // 4. Per-bot cooldown
        let now = Utc::now();
        if let Some(last) = bot.last_response_at {
            let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
            if elapsed_ms < self.config.cooldown_ms as i64 {
                return Ok(RespondDecision::refused(RespondReason::Cooldown));
            }
        }

        // 5. Classify
        let priority = self.classify_priority(message_text, is_mention);

        // 6. Race for the claim
        let claim = MessageClaim::new(
            chat_id,
            message_id,
            bot_id,
            priority,
            self.config.claim_ttl_ms,
        );
        let max_live = if self.config.allow_multiple_responses {
            self.config.max_bots_per_message as usize
        } else {
            1
        };
        match self.claims.try_claim(claim, max_live, now).await? {
            ClaimAttempt::Granted(_) => {}
            ClaimAttempt::Conflict(blocking) => {
                debug!(chat_id, message_id, holder = %blocking.bot_id, "message already claimed");
                return Ok(RespondDecision::refused_with_priority(
                    RespondReason::AlreadyClaimed,
                    priority,
                ));
            }
        }

        // 7. Mark the bot busy -- advisory; the claim is the real lock
        let mut winner = bot;
        winner.status = BotStatus::Busy;
        self.bots.update(&winner).await?;

        debug!(chat_id, message_id, bot_id, %priority, "claim granted");
        Ok(RespondDecision::granted(priority))
    }

    /// Report that a bot started generating its response.
    ///
    /// Re-arms the claim's lease to `processing_timeout_ms` from now, so a
    /// slow response is not reclaimed mid-generation. Returns whether an
    /// open claim was found.
    pub async fn begin_processing(
        &self,
        chat_id: &str,
        message_id: &str,
        bot_id: &str,
    ) -> Result<bool, CoordinationError> {
        let key = ClaimKey::new(chat_id, message_id);
        let deadline =
            Utc::now() + chrono::Duration::milliseconds(self.config.processing_timeout_ms as i64);
        let updated = self
            .claims
            .set_status(&key, bot_id, ClaimStatus::Processing, Some(deadline))
            .await?;
        Ok(updated.is_some())
    }

    /// Report a delivered response.
    ///
    /// The bot comes back online with its cooldown window restarted and its
    /// response count bumped. When `response_time_ms` is absent, latency is
    /// derived from the claim's age; a completion whose claim already
    /// expired still counts, with a zero-latency sample.
    pub async fn complete_response(
        &self,
        bot_id: &str,
        chat_id: &str,
        message_id: &str,
        response_time_ms: Option<u64>,
    ) -> Result<(), CoordinationError> {
        let now = Utc::now();
        let key = ClaimKey::new(chat_id, message_id);
        let completed = self
            .claims
            .set_status(&key, bot_id, ClaimStatus::Completed, None)
            .await?;

        let elapsed_ms = response_time_ms
            .or_else(|| {
                completed.as_ref().map(|claim| {
                    now.signed_duration_since(claim.claimed_at)
                        .num_milliseconds()
                        .max(0) as u64
                })
            })
            .unwrap_or(0);
        if completed.is_none() {
            debug!(chat_id, message_id, bot_id, "completion without an open claim");
        }

        if let Some(mut bot) = self.bots.get(bot_id).await? {
            bot.status = BotStatus::Online;
            bot.last_response_at = Some(now);
            bot.response_count += 1;
            self.bots.update(&bot).await?;
        }

        self.stats.record_response(bot_id, elapsed_ms);
        info!(chat_id, message_id, bot_id, response_time_ms = elapsed_ms, "response completed");
        Ok(())
    }

    /// Report that a bot gave up on its claimed message.
    ///
    /// The claim is marked failed, which frees the slot for another bot
    /// immediately. The bot comes back online without touching its cooldown
    /// window.
    pub async fn fail_response(
        &self,
        bot_id: &str,
        chat_id: &str,
        message_id: &str,
        error: &str,
    ) -> Result<(), CoordinationError> {
        let key = ClaimKey::new(chat_id, message_id);
        let failed = self
            .claims
            .set_status(&key, bot_id, ClaimStatus::Failed, None)
            .await?;
        if failed.is_none() {
            debug!(chat_id, message_id, bot_id, "failure report without an open claim");
        }

        if let Some(mut bot) = self.bots.get(bot_id).await? {
            bot.status = BotStatus::Online;
            self.bots.update(&bot).await?;
        }

        self.stats.record_failure();
        warn!(chat_id, message_id, bot_id, error, "response failed");
        Ok(())
    }

    /// The roster, in registration order.
    pub async fn list_bots(&self) -> Result<Vec<Bot>, CoordinationError> {
        Ok(self.bots.list().await?)
    }

    /// Number of claims currently held, across all statuses.
    pub async fn active_claims(&self) -> Result<usize, CoordinationError> {
        Ok(self.claims.count().await?)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Drop every claim past its lease. Called by the sweeper; this is the
    /// only path that reclaims completed or stuck claims.
    pub async fn sweep_expired_claims(&self) -> Result<usize, CoordinationError> {
        let removed = self.claims.sweep_expired(Utc::now()).await?;
        if removed > 0 {
            debug!(removed, "swept expired claims");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::repository::memory::{MemoryBotRepository, MemoryClaimRepository};

    fn coordinator_with(
        config: CoordinationConfig,
    ) -> Coordinator<MemoryClaimRepository, MemoryBotRepository> {
        Coordinator::new(
            config,
            MemoryClaimRepository::new(),
            MemoryBotRepository::new(),
            AlertBus::new(16),
        )
    }

    fn coordinator() -> Coordinator<MemoryClaimRepository, MemoryBotRepository> {
        coordinator_with(CoordinationConfig::default())
    }

    fn registration(id: &str, weight: Option<u32>) -> BotRegistration {
        BotRegistration {
            id: id.to_string(),
            name: id.to_uppercase(),
            weight,
        }
    }

    #[tokio::test]
    async fn register_bot_defaults_weight_to_one() {
        let coordinator = coordinator();
        let bot = coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        assert_eq!(bot.weight, 1);
        assert_eq!(bot.status, BotStatus::Online);
        assert_eq!(bot.response_count, 0);
    }

    #[tokio::test]
    async fn register_bot_rejects_out_of_range_weight() {
        let coordinator = coordinator();
        let low = coordinator.register_bot(registration("b1", Some(0))).await;
        assert!(matches!(low, Err(CoordinationError::InvalidWeight(0))));
        let high = coordinator.register_bot(registration("b1", Some(11))).await;
        assert!(matches!(high, Err(CoordinationError::InvalidWeight(11))));
    }

    #[tokio::test]
    async fn register_bot_rejects_blank_id() {
        let coordinator = coordinator();
        let result = coordinator.register_bot(registration("   ", None)).await;
        assert!(matches!(result, Err(CoordinationError::EmptyBotId)));
    }

    #[tokio::test]
    async fn reregistration_preserves_history() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", Some(2)))
            .await
            .unwrap();
        coordinator
            .complete_response("b1", "c1", "m1", Some(100))
            .await
            .unwrap();

        let bot = coordinator
            .register_bot(registration("b1", Some(7)))
            .await
            .unwrap();
        assert_eq!(bot.response_count, 1);
        assert_eq!(bot.weight, 7);
        assert_eq!(bot.status, BotStatus::Online);
        assert!(bot.last_response_at.is_some());
        assert_eq!(coordinator.list_bots().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unregister_reports_presence() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        assert!(coordinator.unregister_bot("b1").await.unwrap());
        assert!(!coordinator.unregister_bot("b1").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_bot_is_refused() {
        let coordinator = coordinator();
        let decision = coordinator
            .should_respond("c1", "m1", "ghost", "hello", false)
            .await
            .unwrap();
        assert!(!decision.respond);
        assert_eq!(decision.reason.to_string(), "bot-not-registered");
        assert!(decision.priority.is_none());
    }

    #[tokio::test]
    async fn offline_bot_is_refused_with_its_status() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .set_bot_status("b1", BotStatus::Offline)
            .await
            .unwrap();

        let decision = coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();
        assert!(!decision.respond);
        assert_eq!(decision.reason.to_string(), "bot-status-offline");
    }

    #[tokio::test]
    async fn first_bot_claims_second_is_blocked() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("b2", None))
            .await
            .unwrap();

        let first = coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();
        assert!(first.respond);
        assert_eq!(first.reason.to_string(), "claimed");
        assert_eq!(first.priority, Some(Priority::Normal));

        let second = coordinator
            .should_respond("c1", "m1", "b2", "hello", false)
            .await
            .unwrap();
        assert!(!second.respond);
        assert_eq!(second.reason.to_string(), "already-claimed");
        assert_eq!(second.priority, Some(Priority::Normal));
    }

    #[tokio::test]
    async fn claim_winner_goes_busy() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();

        let bots = coordinator.list_bots().await.unwrap();
        assert_eq!(bots[0].status, BotStatus::Busy);
        assert_eq!(coordinator.active_claims().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn busy_bot_is_refused_for_other_messages() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();

        let decision = coordinator
            .should_respond("c1", "m2", "b1", "hello", false)
            .await
            .unwrap();
        assert!(!decision.respond);
        assert_eq!(decision.reason.to_string(), "bot-status-busy");
    }

    #[tokio::test]
    async fn cooldown_blocks_repeat_responses() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .complete_response("b1", "c1", "m1", Some(50))
            .await
            .unwrap();

        let decision = coordinator
            .should_respond("c1", "m2", "b1", "hello", false)
            .await
            .unwrap();
        assert!(!decision.respond);
        assert_eq!(decision.reason.to_string(), "cooldown");
    }

    #[tokio::test]
    async fn cooldown_window_expires() {
        let mut config = CoordinationConfig::default();
        config.cooldown_ms = 1;
        let coordinator = coordinator_with(config);
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .complete_response("b1", "c1", "m1", Some(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let decision = coordinator
            .should_respond("c1", "m2", "b1", "hello", false)
            .await
            .unwrap();
        assert!(decision.respond);
    }

    #[tokio::test]
    async fn mention_gate_refuses_unmentioned_messages() {
        let mut config = CoordinationConfig::default();
        config.require_mention = true;
        let coordinator = coordinator_with(config);
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();

        let ignored = coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();
        assert!(!ignored.respond);
        assert_eq!(ignored.reason.to_string(), "mention-required");

        let mentioned = coordinator
            .should_respond("c1", "m1", "b1", "hello", true)
            .await
            .unwrap();
        assert!(mentioned.respond);
        assert_eq!(mentioned.priority, Some(Priority::Urgent));
    }

    #[tokio::test]
    async fn failed_response_frees_the_message() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("b2", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();

        coordinator
            .fail_response("b1", "c1", "m1", "provider timeout")
            .await
            .unwrap();

        let retry = coordinator
            .should_respond("c1", "m1", "b2", "hello", false)
            .await
            .unwrap();
        assert!(retry.respond);
        assert_eq!(coordinator.stats().total_failures, 1);
    }

    #[tokio::test]
    async fn completed_message_blocks_new_claims() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("b2", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();
        coordinator
            .complete_response("b1", "c1", "m1", Some(25))
            .await
            .unwrap();

        let echo = coordinator
            .should_respond("c1", "m1", "b2", "hello", false)
            .await
            .unwrap();
        assert!(!echo.respond);
        assert_eq!(echo.reason.to_string(), "already-claimed");
    }

    #[tokio::test]
    async fn multiple_responses_allowed_when_configured() {
        let mut config = CoordinationConfig::default();
        config.allow_multiple_responses = true;
        config.max_bots_per_message = 2;
        let coordinator = coordinator_with(config);
        for id in ["b1", "b2", "b3"] {
            coordinator
                .register_bot(registration(id, None))
                .await
                .unwrap();
        }

        assert!(
            coordinator
                .should_respond("c1", "m1", "b1", "hello", false)
                .await
                .unwrap()
                .respond
        );
        assert!(
            coordinator
                .should_respond("c1", "m1", "b2", "hello", false)
                .await
                .unwrap()
                .respond
        );
        let third = coordinator
            .should_respond("c1", "m1", "b3", "hello", false)
            .await
            .unwrap();
        assert_eq!(third.reason.to_string(), "already-claimed");
    }

    #[tokio::test]
    async fn classification_matches_keyword_tiers() {
        let coordinator = coordinator();
        assert_eq!(
            coordinator.classify_priority("URGENT please help now", false),
            Priority::Urgent
        );
        assert_eq!(
            coordinator.classify_priority("what time is it", false),
            Priority::High
        );
        assert_eq!(
            coordinator.classify_priority("nice weather today", false),
            Priority::Normal
        );
        assert_eq!(
            coordinator.classify_priority("nice weather today", true),
            Priority::Urgent
        );
    }

    #[tokio::test]
    async fn select_bot_skips_offline_and_excluded() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("down", Some(10)))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("skip", Some(10)))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("pick", Some(1)))
            .await
            .unwrap();
        coordinator
            .set_bot_status("down", BotStatus::Offline)
            .await
            .unwrap();

        for _ in 0..25 {
            let selected = coordinator
                .select_bot(&["skip".to_string()])
                .await
                .unwrap()
                .unwrap();
            assert_eq!(selected.id, "pick");
        }
    }

    #[tokio::test]
    async fn exhausted_pool_raises_an_alert() {
        let coordinator = coordinator();
        let mut alerts = coordinator.alerts.subscribe();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();

        let selected = coordinator.select_bot(&["b1".to_string()]).await.unwrap();
        assert!(selected.is_none());
        assert!(matches!(
            alerts.try_recv().unwrap(),
            Alert::BotPoolExhausted { registered_bots: 1 }
        ));
    }

    #[tokio::test]
    async fn completion_updates_bot_and_stats() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();
        coordinator
            .complete_response("b1", "c1", "m1", Some(120))
            .await
            .unwrap();

        let bots = coordinator.list_bots().await.unwrap();
        assert_eq!(bots[0].status, BotStatus::Online);
        assert_eq!(bots[0].response_count, 1);
        assert!(bots[0].last_response_at.is_some());

        let stats = coordinator.stats();
        assert_eq!(stats.total_responses, 1);
        assert!((stats.average_response_time_ms - 120.0).abs() < f64::EPSILON);
        assert_eq!(stats.responses_by_bot.get("b1"), Some(&1));
    }

    #[tokio::test]
    async fn completion_without_claim_is_tolerated() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();

        coordinator
            .complete_response("b1", "c1", "never-claimed", None)
            .await
            .unwrap();
        assert_eq!(coordinator.stats().total_responses, 1);
    }

    #[tokio::test]
    async fn begin_processing_requires_an_open_claim() {
        let coordinator = coordinator();
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();

        assert!(coordinator.begin_processing("c1", "m1", "b1").await.unwrap());
        assert!(!coordinator.begin_processing("c1", "m1", "b2").await.unwrap());
        assert!(!coordinator.begin_processing("c1", "m2", "b1").await.unwrap());
    }

    #[tokio::test]
    async fn expired_claims_are_swept_and_rewinnable() {
        let mut config = CoordinationConfig::default();
        config.claim_ttl_ms = 1;
        let coordinator = coordinator_with(config);
        coordinator
            .register_bot(registration("b1", None))
            .await
            .unwrap();
        coordinator
            .register_bot(registration("b2", None))
            .await
            .unwrap();
        coordinator
            .should_respond("c1", "m1", "b1", "hello", false)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        let removed = coordinator.sweep_expired_claims().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(coordinator.active_claims().await.unwrap(), 0);

        let rewon = coordinator
            .should_respond("c1", "m1", "b2", "hello", false)
            .await
            .unwrap();
        assert!(rewon.respond);
    }

    #[tokio::test]
    async fn concurrent_checks_grant_at_most_one_claim() {
        let coordinator = Arc::new(coordinator());
        for i in 0..10 {
            coordinator
                .register_bot(registration(&format!("bot-{i}"), None))
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for i in 0..10 {
            let coordinator = Arc::clone(&coordinator);
            handles.push(tokio::spawn(async move {
                coordinator
                    .should_respond("c1", "m1", &format!("bot-{i}"), "hello", false)
                    .await
                    .unwrap()
            }));
        }

        let mut granted = 0;
        for handle in handles {
            if handle.await.unwrap().respond {
                granted += 1;
            }
        }
        assert_eq!(granted, 1);
    }
}
