//! # Per-event-type handler registry and the delivery algorithm.
//!
//! One [`EventQueue`] exists per declared event type. It keeps registered
//! entries in priority buckets and owns the single-pass delivery algorithm
//! every strategy funnels through.
//!
//! ## Architecture
//! ```text
//! EventQueue (one per TypeId)
//!   buckets: BTreeMap<Reverse<priority>, bucket>
//!     ├─► [prio 100] ─ Mutex<Vec<HandlerEntry>>   (insertion order = tie-break)
//!     ├─► [prio   0] ─ Mutex<Vec<HandlerEntry>>
//!     └─► [prio -10] ─ Mutex<Vec<HandlerEntry>>
//! ```
//!
//! ## Locking rules
//! - Bucket *membership* (creating a bucket for a new priority) is guarded by
//!   the outer map lock, held only for the map operation.
//! - Entries within one bucket are guarded by that bucket's own lock.
//!   Delivery holds it for the duration of that bucket's inner loop, so
//!   blocking is bounded by one bucket, never the whole queue: registration
//!   for an unrelated priority proceeds while a dispatch is in flight.
//! - `remove_all` takes each bucket lock in turn; relative to an in-flight
//!   delivery over the same bucket it therefore lands fully before or fully
//!   after that bucket's pass, never mid-iteration.
//!
//! ## Ordering
//! Buckets are walked highest priority first; within a bucket, insertion
//! order. There is no bucket-level short-circuit: even after a veto or an
//! exceeded deadline the loop keeps evaluating entries, because non-vetoable
//! and deadline-exempt entries must still run.

use std::any::TypeId;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::events::entry::{Delivery, HandlerEntry};
use crate::events::event::{ErasedEvent, Event};
use crate::events::policy::DeliverPolicy;
use crate::handlers::OwnerId;

/// Entries sharing one priority, in registration order.
type Bucket = Arc<Mutex<Vec<HandlerEntry>>>;

/// Concurrent, priority-bucketed registry of handlers for one event type.
///
/// Created by [`Bus::declare`](crate::Bus::declare) and mutated by
/// registration from any task at any time, including while a dispatch over
/// it is in flight.
pub struct EventQueue {
    event_type: TypeId,
    type_name: &'static str,
    buckets: RwLock<BTreeMap<Reverse<i32>, Bucket>>,
}

impl EventQueue {
    pub(crate) fn new<E: Event>() -> Self {
        Self {
            event_type: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            buckets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Exact-match identity key of the event type this queue serves.
    pub fn event_type(&self) -> TypeId {
        self.event_type
    }

    /// Event type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Registers an entry in the bucket for its priority.
    ///
    /// Creates the bucket if this is the first entry at that priority.
    /// Concurrent adds for different priorities do not contend; adds for the
    /// same priority serialize on that bucket only.
    pub async fn add(&self, entry: HandlerEntry) {
        let bucket = {
            let buckets = self.buckets.read().await;
            buckets.get(&Reverse(entry.priority())).cloned()
        };

        let bucket = match bucket {
            Some(bucket) => bucket,
            None => {
                // Buckets are never removed once created, so the Arc we
                // insert (or find, if another add raced us here) stays live.
                let mut buckets = self.buckets.write().await;
                buckets
                    .entry(Reverse(entry.priority()))
                    .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
                    .clone()
            }
        };

        debug!(
            event_type = self.type_name,
            handler = entry.target_name(),
            priority = entry.priority(),
            "registered handler"
        );
        bucket.lock().await.push(entry);
    }

    /// Removes every entry registered under `owner`, across all buckets.
    ///
    /// Returns the number of entries removed.
    pub async fn remove_all(&self, owner: OwnerId) -> usize {
        let buckets: Vec<Bucket> = {
            let buckets = self.buckets.read().await;
            buckets.values().cloned().collect()
        };

        let mut removed = 0;
        for bucket in buckets {
            let mut entries = bucket.lock().await;
            let before = entries.len();
            entries.retain(|entry| entry.owner() != owner);
            removed += before - entries.len();
        }

        if removed > 0 {
            debug!(
                event_type = self.type_name,
                ?owner,
                removed,
                "removed handlers from notification queue"
            );
        }
        removed
    }

    /// Delivers one event to all currently eligible entries.
    ///
    /// The core algorithm (shared by the inline and worker strategies):
    /// record the start instant, walk buckets highest priority first, and
    /// within each bucket — under that bucket's lock — evaluate
    /// [`HandlerEntry::can_invoke`] per entry and invoke the eligible ones.
    /// A veto flips the dispatch-local flag and the loop continues; failures
    /// are reported and swallowed.
    pub async fn deliver(&self, event: &ErasedEvent, policy: &DeliverPolicy) {
        let start = Instant::now();
        let mut vetoed = false;

        let buckets: Vec<Bucket> = {
            let buckets = self.buckets.read().await;
            buckets.values().cloned().collect()
        };

        for bucket in buckets {
            let entries = bucket.lock().await;
            for entry in entries.iter() {
                if !entry.can_invoke(policy, vetoed, start) {
                    continue;
                }

                match entry.notify(event).await {
                    Delivery::Delivered => {}
                    Delivery::Vetoed => vetoed = true,
                    Delivery::Failed(err) => {
                        warn!(
                            event_type = self.type_name,
                            handler = entry.target_name(),
                            error = %err,
                            "handler failed during dispatch"
                        );
                    }
                }
            }
        }
    }

    /// Copies all entries out, highest priority first, insertion order within
    /// a priority.
    ///
    /// Used by the pool strategy, which submits one task per entry instead of
    /// iterating under bucket locks.
    pub async fn snapshot(&self) -> Vec<HandlerEntry> {
        let buckets: Vec<Bucket> = {
            let buckets = self.buckets.read().await;
            buckets.values().cloned().collect()
        };

        let mut entries = Vec::new();
        for bucket in buckets {
            entries.extend(bucket.lock().await.iter().cloned());
        }
        entries
    }

    /// Total number of registered entries.
    pub async fn len(&self) -> usize {
        let buckets: Vec<Bucket> = {
            let buckets = self.buckets.read().await;
            buckets.values().cloned().collect()
        };

        let mut len = 0;
        for bucket in buckets {
            len += bucket.lock().await.len();
        }
        len
    }

    /// True if no entries are registered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("event_type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use crate::error::HandlerError;
    use crate::events::priority;
    use crate::handlers::{HandlerFn, HandlerRef, HandlerSpec, Verdict};

    struct Ping;
    impl Event for Ping {}

    type Log = Arc<StdMutex<Vec<&'static str>>>;

    fn recorder(log: &Log, tag: &'static str) -> HandlerRef<Ping> {
        let log = Arc::clone(log);
        HandlerFn::arc(tag, move |_: &Ping| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(tag);
                Ok::<_, HandlerError>(Verdict::Pass)
            }
        })
    }

    fn vetoer(log: &Log, tag: &'static str) -> HandlerRef<Ping> {
        let log = Arc::clone(log);
        HandlerFn::arc(tag, move |_: &Ping| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(tag);
                Ok::<_, HandlerError>(Verdict::Veto)
            }
        })
    }

    #[tokio::test]
    async fn test_descending_priority_then_insertion_order() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        queue.add(HandlerSpec::new(owner, recorder(&log, "low")).priority(priority::LOW).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "first")).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "second")).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "high")).priority(priority::HIGH).into_entry()).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::unbounded()).await;

        assert_eq!(*log.lock().unwrap(), ["high", "first", "second", "low"]);
    }

    #[tokio::test]
    async fn test_veto_suppresses_vetoable_entries_only() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        queue.add(
            HandlerSpec::new(owner, vetoer(&log, "gate")).priority(priority::HIGH).into_entry(),
        ).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "skipped")).into_entry()).await;
        queue.add(
            HandlerSpec::new(owner, recorder(&log, "audit"))
                .priority(5)
                .vetoable(false)
                .into_entry(),
        ).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::unbounded()).await;

        assert_eq!(*log.lock().unwrap(), ["gate", "audit"]);
    }

    #[tokio::test]
    async fn test_floor_filters_below_minimum_priority() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        queue.add(HandlerSpec::new(owner, recorder(&log, "high")).priority(priority::HIGH).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "normal")).into_entry()).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::with_floor(priority::HIGH)).await;

        assert_eq!(*log.lock().unwrap(), ["high"]);
    }

    #[tokio::test]
    async fn test_deadline_exempt_entry_outlives_budget() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        // Burns the whole budget before lower-priority entries are reached.
        let slow: HandlerRef<Ping> = HandlerFn::arc("slow", |_: &Ping| async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok::<_, HandlerError>(Verdict::Pass)
        });
        queue.add(HandlerSpec::new(owner, slow).priority(priority::HIGH).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "late")).into_entry()).await;
        queue.add(
            HandlerSpec::new(owner, recorder(&log, "exempt"))
                .priority(priority::LOW)
                .deadline_exempt(true)
                .into_entry(),
        ).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue
            .deliver(&event, &DeliverPolicy::with_deadline(Duration::from_millis(5)))
            .await;

        assert_eq!(*log.lock().unwrap(), ["exempt"]);
    }

    #[tokio::test]
    async fn test_failed_handler_does_not_abort_dispatch() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        let failing: HandlerRef<Ping> = HandlerFn::arc("failing", |_: &Ping| async move {
            Err::<Verdict, _>(HandlerError::fail("boom"))
        });
        queue.add(HandlerSpec::new(owner, failing).priority(priority::HIGH).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "after")).into_entry()).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::unbounded()).await;

        assert_eq!(*log.lock().unwrap(), ["after"]);
    }

    #[tokio::test]
    async fn test_remove_all_is_scoped_to_owner() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let keep = OwnerId::next();
        let drop_me = OwnerId::next();

        queue.add(HandlerSpec::new(keep, recorder(&log, "keep")).into_entry()).await;
        queue.add(HandlerSpec::new(drop_me, recorder(&log, "a")).into_entry()).await;
        queue.add(
            HandlerSpec::new(drop_me, recorder(&log, "b")).priority(priority::HIGH).into_entry(),
        ).await;

        assert_eq!(queue.remove_all(drop_me).await, 2);
        assert_eq!(queue.len().await, 1);

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::unbounded()).await;
        assert_eq!(*log.lock().unwrap(), ["keep"]);
    }

    #[tokio::test]
    async fn test_duplicate_registration_notifies_twice() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        let handler = recorder(&log, "dup");
        queue.add(HandlerSpec::new(owner, Arc::clone(&handler)).into_entry()).await;
        queue.add(HandlerSpec::new(owner, handler).into_entry()).await;

        let event: ErasedEvent = Arc::new(Ping);
        queue.deliver(&event, &DeliverPolicy::unbounded()).await;

        assert_eq!(*log.lock().unwrap(), ["dup", "dup"]);
    }

    #[tokio::test]
    async fn test_snapshot_preserves_delivery_order() {
        let queue = EventQueue::new::<Ping>();
        let log: Log = Arc::new(StdMutex::new(Vec::new()));
        let owner = OwnerId::next();

        queue.add(HandlerSpec::new(owner, recorder(&log, "n1")).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "h")).priority(priority::HIGH).into_entry()).await;
        queue.add(HandlerSpec::new(owner, recorder(&log, "n2")).into_entry()).await;

        let entries = queue.snapshot().await;
        let names: Vec<&str> = entries.iter().map(|e| e.target_name()).collect();
        assert_eq!(names, ["h", "n1", "n2"]);
    }
}
