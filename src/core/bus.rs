//! # The event bus: queue lifecycle, registration, and push.
//!
//! [`Bus`] owns one [`EventQueue`] per declared event type, keyed by exact
//! [`TypeId`](std::any::TypeId), and forwards every push to its configured
//! [`Dispatch`] strategy.
//!
//! ## Control flow
//! ```text
//! producer ──► Bus::push(event [, deadline | min priority])
//!                │ resolve queue by the event's exact type
//!                ▼
//!              Dispatch::push(queue, erased event, policy)
//!                │ inline / worker / pool
//!                ▼
//!              EventQueue::deliver ──► HandlerEntry::notify per entry
//! ```
//!
//! ## Rules
//! - Pushing an event type with no declared queue is a silent no-op, by
//!   design; callers that need visibility check [`Bus::contains`] first.
//! - Queue membership (`declare` / `remove`) is serialized on the queue map,
//!   separately from per-bucket handler changes — declaring a new event type
//!   never contends with an in-flight delivery.
//! - Removing a queue does not interrupt a dispatch already in flight over
//!   it; the dispatch completes against the detached queue.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::core::builder::BusBuilder;
use crate::dispatch::Dispatch;
use crate::events::{DeliverPolicy, ErasedEvent, Event, EventQueue};
use crate::handlers::{HandlerSpec, OwnerId};

pub(crate) struct BusInner {
    pub(crate) queues: RwLock<HashMap<TypeId, Arc<EventQueue>>>,
    pub(crate) dispatch: Arc<dyn Dispatch>,
}

/// Typed in-process event dispatcher.
///
/// Cheap to clone; all clones share the same queues and strategy.
#[derive(Clone)]
pub struct Bus {
    inner: Arc<BusInner>,
}

impl Bus {
    /// Starts building a bus; the default strategy is
    /// [`InlineDispatch`](crate::InlineDispatch).
    #[must_use]
    pub fn builder() -> BusBuilder {
        BusBuilder::new()
    }

    pub(crate) fn from_inner(inner: BusInner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    /// Declares an event type, creating its queue.
    ///
    /// Idempotent: declaring an already-declared type keeps the existing
    /// queue and its registrations.
    pub async fn declare<E: Event>(&self) {
        let mut queues = self.inner.queues.write().await;
        queues
            .entry(TypeId::of::<E>())
            .or_insert_with(|| {
                debug!(event_type = std::any::type_name::<E>(), "declared event type");
                Arc::new(EventQueue::new::<E>())
            });
    }

    /// Removes the queue for an event type.
    ///
    /// Fails silently if no queue exists. Handlers registered against the
    /// removed type are dropped with it.
    pub async fn remove<E: Event>(&self) {
        let mut queues = self.inner.queues.write().await;
        if queues.remove(&TypeId::of::<E>()).is_some() {
            debug!(event_type = std::any::type_name::<E>(), "removed event type");
        }
    }

    /// True if a queue is declared for `E`.
    pub async fn contains<E: Event>(&self) -> bool {
        self.inner.queues.read().await.contains_key(&TypeId::of::<E>())
    }

    /// Registers a handler against its event type's queue.
    ///
    /// Returns `true` when an entry was added. A registration against an
    /// undeclared event type is skipped with a diagnostic and returns
    /// `false` — it never reaches any queue.
    ///
    /// The same handler may be registered any number of times; entries are
    /// not deduplicated.
    pub async fn add_handler<E: Event>(&self, spec: HandlerSpec<E>) -> bool {
        let queue = {
            let queues = self.inner.queues.read().await;
            queues.get(&TypeId::of::<E>()).cloned()
        };

        match queue {
            Some(queue) => {
                queue.add(spec.into_entry()).await;
                true
            }
            None => {
                warn!(
                    event_type = std::any::type_name::<E>(),
                    "skipping handler registration: event type not declared"
                );
                false
            }
        }
    }

    /// Deregisters every handler registered under `owner`, across all
    /// queues. Returns the number of entries removed.
    ///
    /// Relative to an in-flight dispatch, removal from a bucket lands fully
    /// before or fully after that bucket's delivery pass — the owner's
    /// handlers in one bucket are either all notified or none are.
    pub async fn remove_all(&self, owner: OwnerId) -> usize {
        let queues: Vec<Arc<EventQueue>> = {
            let queues = self.inner.queues.read().await;
            queues.values().cloned().collect()
        };

        let mut removed = 0;
        for queue in queues {
            removed += queue.remove_all(owner).await;
        }
        removed
    }

    /// Pushes an event with no floor and no deadline.
    ///
    /// When this returns depends on the strategy: inline means "all eligible
    /// handlers ran", worker and pool mean "accepted for execution".
    pub async fn push<E: Event>(&self, event: E) {
        self.dispatch(event, DeliverPolicy::unbounded()).await;
    }

    /// Pushes an event with a soft deadline.
    ///
    /// Once the budget (measured from processing start) is exceeded,
    /// remaining non-exempt handlers are skipped; a running handler is never
    /// interrupted. A zero deadline means unbounded.
    pub async fn push_with_deadline<E: Event>(&self, event: E, deadline: Duration) {
        self.dispatch(event, DeliverPolicy::with_deadline(deadline)).await;
    }

    /// Pushes an event notifying only handlers at or above `floor`.
    pub async fn push_min_priority<E: Event>(&self, event: E, floor: i32) {
        self.dispatch(event, DeliverPolicy::with_floor(floor)).await;
    }

    async fn dispatch<E: Event>(&self, event: E, policy: DeliverPolicy) {
        let queue = {
            let queues = self.inner.queues.read().await;
            queues.get(&TypeId::of::<E>()).cloned()
        };

        let Some(queue) = queue else {
            trace!(
                event_type = std::any::type_name::<E>(),
                "no queue declared for event type; dropping event"
            );
            return;
        };

        let event: ErasedEvent = Arc::new(event);
        self.inner.dispatch.push(queue, event, policy).await;
    }
}

impl Default for Bus {
    /// An inline-strategy bus, equivalent to `Bus::builder().build()`.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus").finish_non_exhaustive()
    }
}
