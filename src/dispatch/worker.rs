//! # Worker strategy: one dedicated delivery task.
//!
//! `push` enqueues the dispatch on an unbounded FIFO and returns
//! immediately; a single background worker dequeues and runs deliveries one
//! at a time.
//!
//! ## Architecture
//! ```text
//! push(queue, event, policy) ──► [unbounded FIFO] ──► worker task
//!                                                       └─► queue.deliver()
//! ```
//!
//! ## Rules
//! - Global FIFO: dispatches run in enqueue order, across all producers.
//! - One delivery at a time; a slow handler delays everything behind it
//!   (if producers outpace the worker, the backlog grows without bound).
//! - The deadline budget is measured from *processing* start, not enqueue
//!   time, so backlog does not eat into a handler's budget.
//! - [`WorkerDispatch::stop`] cancels between deliveries, never
//!   mid-delivery; [`WorkerDispatch::join`] awaits the worker's exit.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::dispatch::strategy::Dispatch;
use crate::events::{DeliverPolicy, ErasedEvent, EventQueue};

/// One queued dispatch, waiting for the worker.
struct Job {
    queue: Arc<EventQueue>,
    event: ErasedEvent,
    policy: DeliverPolicy,
    enqueued_at: Instant,
}

/// Dedicated-worker execution strategy.
pub struct WorkerDispatch {
    tx: mpsc::UnboundedSender<Job>,
    token: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerDispatch {
    /// Creates the strategy and spawns its worker task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let token = CancellationToken::new();

        let worker_token = token.clone();
        let worker = tokio::spawn(async move {
            loop {
                let job = tokio::select! {
                    // Checked first so a stop() issued during a delivery wins
                    // over backlog already sitting in the channel.
                    biased;
                    _ = worker_token.cancelled() => break,
                    job = rx.recv() => match job {
                        Some(job) => job,
                        None => break, // all senders gone
                    },
                };

                trace!(
                    event_type = job.queue.type_name(),
                    waited = ?job.enqueued_at.elapsed(),
                    "dequeued event"
                );
                job.queue.deliver(&job.event, &job.policy).await;
            }
        });

        Self { tx, token, worker: Mutex::new(Some(worker)) }
    }

    /// Requests the worker to stop.
    ///
    /// The worker finishes the delivery it is currently running (a deadline
    /// never interrupts a handler, and neither does stopping) and exits
    /// before picking up the next one. Events still queued are dropped.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Waits for the worker task to exit.
    ///
    /// Call after [`WorkerDispatch::stop`] for a graceful shutdown.
    pub async fn join(&self) {
        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Default for WorkerDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for WorkerDispatch {
    async fn push(&self, queue: Arc<EventQueue>, event: ErasedEvent, policy: DeliverPolicy) {
        let job = Job { queue, event, policy, enqueued_at: Instant::now() };
        if let Err(err) = self.tx.send(job) {
            warn!(
                event_type = err.0.queue.type_name(),
                "worker stopped; dropping event"
            );
        }
    }
}
