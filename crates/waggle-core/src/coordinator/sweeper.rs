//! Background sweeper reclaiming expired claims.
//!
//! Claims are never reclaimed inline on the request path -- the sweeper is
//! the only thing that deletes them. It scans on a fixed interval and drops
//! every claim past its lease, whatever its status.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::repository::bot::BotRepository;
use crate::repository::claim::ClaimRepository;

use super::service::Coordinator;

/// How often the sweeper scans for expired claims.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Handle to a running sweeper task.
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Spawn the periodic sweep loop.
///
/// Runs until the returned handle is shut down. A failed sweep is logged
/// and the loop keeps going.
pub fn spawn_sweeper<C, B>(
    coordinator: Arc<Coordinator<C, B>>,
    interval: Duration,
) -> SweeperHandle
where
    C: ClaimRepository + 'static,
    B: BotRepository + 'static,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a fresh daemon does
        // not sweep an empty map.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(err) = coordinator.sweep_expired_claims().await {
                        error!(%err, "claim sweep failed");
                    }
                }
            }
        }
    });

    SweeperHandle { cancel, task }
}
