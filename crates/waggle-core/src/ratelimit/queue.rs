//! FIFO admission queue in front of the rate limiter.
//!
//! Callers that cannot acquire budget immediately park here. A drainer task
//! re-examines the queue head on a short interval and admits requests as
//! budget refills.
//!
//! The queue is strictly head-of-line: only the head request is ever
//! inspected, so a large request at the head blocks smaller ones behind it
//! until its budget frees up. That keeps admission order fair -- no request
//! can starve -- at the cost of throughput when request sizes vary widely.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use waggle_types::error::RateLimitError;
use waggle_types::provider::{AcquireOutcome, Provider};

use super::limiter::RateLimiter;

/// How often the drainer re-examines the queue head.
pub const DEFAULT_DRAIN_INTERVAL: Duration = Duration::from_millis(100);

struct QueuedRequest {
    estimated_tokens: u64,
    reply: oneshot::Sender<Provider>,
}

/// FIFO queue that parks callers until provider budget frees up.
pub struct AdmissionQueue {
    limiter: Arc<RateLimiter>,
    pending: Mutex<VecDeque<QueuedRequest>>,
}

impl AdmissionQueue {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self {
            limiter,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Park a request and resolve it once a provider admits it.
    ///
    /// Resolves immediately when budget is on hand and nothing is queued
    /// ahead; otherwise the drainer picks it up as budget refills.
    pub async fn acquire(&self, estimated_tokens: u64) -> Result<Provider, RateLimitError> {
        let rx = self.enqueue(estimated_tokens).await;
        // Drain eagerly so a request with budget on hand resolves without
        // waiting for the next tick
        self.drain_once().await;
        rx.await.map_err(|_| RateLimitError::QueueClosed)
    }

    /// Append a request and hand back the channel its admission arrives on.
    pub async fn enqueue(&self, estimated_tokens: u64) -> oneshot::Receiver<Provider> {
        let (reply, rx) = oneshot::channel();
        let mut pending = self.pending.lock().await;
        pending.push_back(QueuedRequest {
            estimated_tokens,
            reply,
        });
        rx
    }

    /// Admit queued requests from the head until one cannot proceed.
    pub async fn drain_once(&self) {
        let mut pending = self.pending.lock().await;
        loop {
            // Skip heads whose callers gave up
            while matches!(pending.front(), Some(req) if req.reply.is_closed()) {
                pending.pop_front();
            }
            let Some(head) = pending.front() else {
                break;
            };

            let estimated_tokens = head.estimated_tokens;
            let Some(provider) = self.admit(estimated_tokens) else {
                // Head cannot go yet; everyone behind it waits
                break;
            };

            let Some(request) = pending.pop_front() else {
                break;
            };
            if request.reply.send(provider).is_err() {
                // Caller dropped between inspection and send; the spent
                // budget is absorbed by the refill
                debug!("queued caller went away after admission");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }

    fn admit(&self, estimated_tokens: u64) -> Option<Provider> {
        let provider = self.limiter.best_provider(estimated_tokens)?;
        match self.limiter.try_acquire(&provider.name, estimated_tokens) {
            Ok(AcquireOutcome::Acquired) => Some(provider),
            Ok(AcquireOutcome::Denied { .. }) => None,
            Err(err) => {
                warn!(%err, provider = %provider.name, "admission attempt failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for AdmissionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionQueue")
            .field("limiter", &self.limiter)
            .finish()
    }
}

/// Handle to a running drainer task.
pub struct DrainerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl DrainerHandle {
    /// Stop the drainer and wait for the task to finish. Parked callers
    /// see `QueueClosed` once the queue itself is dropped.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Spawn the periodic drain loop.
pub fn spawn_drainer(queue: Arc<AdmissionQueue>, interval: Duration) -> DrainerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("drainer stopping");
                    break;
                }
                _ = ticker.tick() => {
                    queue.drain_once().await;
                }
            }
        }
    });

    DrainerHandle { cancel, task }
}
