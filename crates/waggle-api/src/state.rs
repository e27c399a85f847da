//! Application state wiring the coordinator together.
//!
//! AppState holds the coordinator instance shared by all HTTP handlers.
//! The coordinator is generic over its repositories; AppState pins it to
//! the in-memory implementations.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use waggle_core::alert::AlertBus;
use waggle_core::coordinator::{Coordinator, DEFAULT_SWEEP_INTERVAL, SweeperHandle, spawn_sweeper};
use waggle_core::repository::memory::{MemoryBotRepository, MemoryClaimRepository};
use waggle_types::alert::Alert;
use waggle_types::config::WaggleConfig;

/// Coordinator generics pinned to the in-memory repositories.
pub type ConcreteCoordinator = Coordinator<MemoryClaimRepository, MemoryBotRepository>;

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ConcreteCoordinator>,
    pub alerts: AlertBus,
    pub started_at: Instant,
}

/// Handles for the long-running tasks started alongside the server.
pub struct BackgroundTasks {
    sweeper: SweeperHandle,
    alert_cancel: CancellationToken,
    alert_task: JoinHandle<()>,
}

impl BackgroundTasks {
    /// Stop the claim sweeper and the alert logger, waiting for both.
    pub async fn shutdown(self) {
        self.sweeper.shutdown().await;
        self.alert_cancel.cancel();
        let _ = self.alert_task.await;
    }
}

impl AppState {
    /// Wire the coordinator and start its background tasks.
    ///
    /// Must run inside a tokio runtime (it spawns the claim sweeper and
    /// the alert logger).
    pub fn init(config: &WaggleConfig) -> (Self, BackgroundTasks) {
        let alerts = AlertBus::new(64);
        let coordinator = Arc::new(Coordinator::new(
            config.coordination.clone(),
            MemoryClaimRepository::new(),
            MemoryBotRepository::new(),
            alerts.clone(),
        ));

        let sweeper = spawn_sweeper(Arc::clone(&coordinator), DEFAULT_SWEEP_INTERVAL);
        let (alert_cancel, alert_task) = spawn_alert_logger(&alerts);

        (
            Self {
                coordinator,
                alerts,
                started_at: Instant::now(),
            },
            BackgroundTasks {
                sweeper,
                alert_cancel,
                alert_task,
            },
        )
    }
}

/// Forward coordination alerts to the log so operators see them without
/// a subscriber of their own.
fn spawn_alert_logger(alerts: &AlertBus) -> (CancellationToken, JoinHandle<()>) {
    let mut rx = alerts.subscribe();
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(alert) => log_alert(&alert),
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "alert stream lagged, some alerts were not logged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });
    (cancel, task)
}

fn log_alert(alert: &Alert) {
    match alert {
        Alert::CircuitOpened {
            provider,
            disabled_for_ms,
            consecutive_errors,
        } => {
            warn!(%provider, disabled_for_ms, consecutive_errors, "provider circuit opened");
        }
        Alert::ProviderRecovered { provider } => {
            info!(%provider, "provider recovered");
        }
        Alert::BotPoolExhausted { registered_bots } => {
            warn!(registered_bots, "no eligible bot available for selection");
        }
    }
}
