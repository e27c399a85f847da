//! Provider selection and budget admission.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, info, warn};
use waggle_types::alert::Alert;
use waggle_types::error::RateLimitError;
use waggle_types::provider::{AcquireOutcome, Provider, ProviderStatus};

use crate::alert::AlertBus;

use super::provider::ProviderState;

/// Budget gatekeeper for all registered providers.
///
/// Per-provider state lives in a `DashMap`, so an acquire against one
/// provider never contends with reports against another. Within one
/// provider, the map's entry lock makes `try_acquire` atomic across both
/// buckets: either the request and its tokens are both debited, or
/// neither is.
pub struct RateLimiter {
    providers: DashMap<String, ProviderState>,
    seq: AtomicU64,
    alerts: AlertBus,
}

impl RateLimiter {
    pub fn new(alerts: AlertBus) -> Self {
        Self {
            providers: DashMap::new(),
            seq: AtomicU64::new(0),
            alerts,
        }
    }

    /// Register a provider, replacing any existing registration of the same
    /// name (which resets its buckets and error state).
    pub fn register(&self, provider: Provider) -> Result<(), RateLimitError> {
        if provider.requests_per_minute == 0 {
            return Err(RateLimitError::InvalidLimit {
                name: provider.name,
                limit: "request",
            });
        }
        if provider.tokens_per_minute == 0 {
            return Err(RateLimitError::InvalidLimit {
                name: provider.name,
                limit: "token",
            });
        }

        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let name = provider.name.clone();
        let state = ProviderState::new(provider, seq, Instant::now());
        self.providers.insert(name.clone(), state);
        info!(provider = %name, "provider registered");
        Ok(())
    }

    /// Register every provider from a configured list, in order, failing
    /// fast on the first invalid one. Startup wiring for embedders that
    /// load providers from `RateLimitConfig`.
    pub fn register_all(
        &self,
        providers: impl IntoIterator<Item = Provider>,
    ) -> Result<(), RateLimitError> {
        for provider in providers {
            self.register(provider)?;
        }
        Ok(())
    }

    /// The best provider that could serve a request of `estimated_tokens`
    /// right now: lowest priority rank wins, ties broken by registration
    /// order. Providers with an open circuit, too many consecutive errors,
    /// or insufficient budget are skipped.
    pub fn best_provider(&self, estimated_tokens: u64) -> Option<Provider> {
        let now = Instant::now();
        let mut best: Option<(u32, u64, Provider)> = None;

        for mut entry in self.providers.iter_mut() {
            let state = entry.value_mut();
            if !state.is_usable(now) {
                continue;
            }
            state.requests.refill(now);
            state.tokens.refill(now);
            if !state.requests.has(1.0) || !state.tokens.has(estimated_tokens as f64) {
                continue;
            }

            let candidate = (state.provider.priority, state.seq);
            let better = match &best {
                None => true,
                Some((priority, seq, _)) => candidate < (*priority, *seq),
            };
            if better {
                best = Some((state.provider.priority, state.seq, state.provider.clone()));
            }
        }

        best.map(|(_, _, provider)| provider)
    }

    /// Debit one request plus `estimated_tokens` from the named provider.
    ///
    /// Both buckets are checked before either is debited, so a denial never
    /// leaks budget. Denials carry the wait until the request could
    /// succeed: the circuit's remaining window, or the slower of the two
    /// bucket refills.
    pub fn try_acquire(
        &self,
        name: &str,
        estimated_tokens: u64,
    ) -> Result<AcquireOutcome, RateLimitError> {
        let now = Instant::now();
        let mut entry = self
            .providers
            .get_mut(name)
            .ok_or_else(|| RateLimitError::UnknownProvider(name.to_string()))?;
        let state = entry.value_mut();

        if let Some(remaining) = state.disabled_for(now) {
            return Ok(AcquireOutcome::Denied { wait: remaining });
        }

        state.requests.refill(now);
        state.tokens.refill(now);

        let tokens_needed = estimated_tokens as f64;
        if state.requests.has(1.0) && state.tokens.has(tokens_needed) {
            state.requests.consume(1.0);
            state.tokens.consume(tokens_needed);
            return Ok(AcquireOutcome::Acquired);
        }

        let wait = state
            .requests
            .time_until(1.0)
            .max(state.tokens.time_until(tokens_needed));
        Ok(AcquireOutcome::Denied { wait })
    }

    /// Report a successful provider call. Clears the error streak; an open
    /// circuit window runs out on its own.
    pub fn report_success(&self, name: &str) {
        let Some(mut entry) = self.providers.get_mut(name) else {
            warn!(provider = name, "success report for unknown provider");
            return;
        };
        let recovered = entry.value_mut().record_success();
        drop(entry);

        if recovered {
            info!(provider = name, "provider recovered");
            self.alerts.publish(Alert::ProviderRecovered {
                provider: name.to_string(),
            });
        }
    }

    /// Report a failed provider call. A rate-limit failure opens the
    /// circuit with exponential backoff.
    pub fn report_error(&self, name: &str, error: &str, is_rate_limit: bool) {
        let now = Instant::now();
        let Some(mut entry) = self.providers.get_mut(name) else {
            warn!(provider = name, "error report for unknown provider");
            return;
        };
        let state = entry.value_mut();
        let opened = state.record_error(error, is_rate_limit, now);
        let consecutive_errors = state.consecutive_errors;
        drop(entry);

        match opened {
            Some(window) => {
                let disabled_for_ms = window.as_millis() as u64;
                warn!(
                    provider = name,
                    disabled_for_ms, consecutive_errors, error, "provider circuit opened"
                );
                self.alerts.publish(Alert::CircuitOpened {
                    provider: name.to_string(),
                    disabled_for_ms,
                    consecutive_errors,
                });
            }
            None => {
                debug!(provider = name, consecutive_errors, error, "provider error recorded");
            }
        }
    }

    /// Status for one provider, or `None` if it is not registered.
    pub fn provider_status(&self, name: &str) -> Option<ProviderStatus> {
        let now = Instant::now();
        self.providers
            .get_mut(name)
            .map(|mut entry| entry.value_mut().snapshot(now))
    }

    /// Statuses for every provider, ordered by priority rank then name.
    pub fn all_statuses(&self) -> Vec<ProviderStatus> {
        let now = Instant::now();
        let mut statuses: Vec<ProviderStatus> = self
            .providers
            .iter_mut()
            .map(|mut entry| entry.value_mut().snapshot(now))
            .collect();
        statuses.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        statuses
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("providers", &self.providers.len())
            .finish()
    }
}
