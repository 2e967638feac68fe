//! # Pool strategy: one task per handler.
//!
//! `push` submits one independent task per eligible handler — not one task
//! per dispatch — and returns once everything is spawned. Handlers for a
//! single event may therefore run concurrently.
//!
//! ## What this trades away
//! - **Ordering**: tasks are *submitted* in priority order, but completion
//!   order is unspecified.
//! - **Veto precision**: the veto flag is a shared atomic read before each
//!   handler runs and written after a veto, with relaxed consistency. A late
//!   veto may let a few already-running handlers proceed past the flip.
//!   This is accepted best-effort semantics, not linearizable; callers that
//!   need strict veto ordering should use the inline or worker strategy.
//!
//! What is preserved: every task re-checks its own eligibility (vetoable /
//! deadline-exempt) against the shared dispatch state at the moment it runs,
//! through the same predicate the other strategies use. The shared state
//! lives for one dispatch only; nothing survives past it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::dispatch::strategy::Dispatch;
use crate::events::{DeliverPolicy, Delivery, ErasedEvent, EventQueue};

/// Veto flag and start instant shared by all tasks of one dispatch.
struct DispatchState {
    start: Instant,
    vetoed: AtomicBool,
}

/// Pooled execution strategy.
pub struct PoolDispatch {
    permits: Option<Arc<Semaphore>>,
}

impl PoolDispatch {
    /// Creates a pool with unlimited concurrency.
    #[must_use]
    pub fn new() -> Self {
        Self { permits: None }
    }

    /// Creates a pool running at most `limit` handlers at a time.
    ///
    /// `limit = 0` means unlimited, same as [`PoolDispatch::new`].
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self {
            permits: if limit == 0 { None } else { Some(Arc::new(Semaphore::new(limit))) },
        }
    }
}

impl Default for PoolDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatch for PoolDispatch {
    async fn push(&self, queue: Arc<EventQueue>, event: ErasedEvent, policy: DeliverPolicy) {
        let state = Arc::new(DispatchState {
            start: Instant::now(),
            vetoed: AtomicBool::new(false),
        });

        for entry in queue.snapshot().await {
            // The floor is static per dispatch; entries below it never become
            // eligible, so they are not worth a task. Veto/deadline state is
            // dynamic and is re-checked inside the task instead.
            if let Some(floor) = policy.floor {
                if entry.priority() < floor {
                    continue;
                }
            }

            let queue = Arc::clone(&queue);
            let event = Arc::clone(&event);
            let state = Arc::clone(&state);
            let permits = self.permits.clone();

            tokio::spawn(async move {
                let _permit = match permits {
                    Some(permits) => match permits.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        // The semaphore is never closed while the pool lives.
                        Err(_) => return,
                    },
                    None => None,
                };

                let vetoed = state.vetoed.load(Ordering::Relaxed);
                if !entry.can_invoke(&policy, vetoed, state.start) {
                    return;
                }

                match entry.notify(&event).await {
                    Delivery::Delivered => {}
                    Delivery::Vetoed => state.vetoed.store(true, Ordering::Relaxed),
                    Delivery::Failed(err) => {
                        warn!(
                            event_type = queue.type_name(),
                            handler = entry.target_name(),
                            error = %err,
                            "handler failed during pooled dispatch"
                        );
                    }
                }
            });
        }
    }
}
