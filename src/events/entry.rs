//! # Queue entry: one registered handler with its dispatch flags.
//!
//! [`HandlerEntry`] is the immutable record a registration leaves in an
//! [`EventQueue`](crate::EventQueue) bucket. It exposes exactly two
//! operations to the strategies:
//!
//! - [`HandlerEntry::can_invoke`] — the pure eligibility predicate (floor /
//!   veto / deadline). Every strategy runs the *same* predicate, so
//!   ordering, veto and deadline semantics do not depend on the execution
//!   backend.
//! - [`HandlerEntry::notify`] — invokes the target and folds the outcome
//!   into a [`Delivery`]: a veto is reported to the caller (the caller, not
//!   the entry, updates shared veto state), failures and panics are caught
//!   and never propagate.

use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::trace;

use crate::error::HandlerError;
use crate::events::event::ErasedEvent;
use crate::events::policy::DeliverPolicy;
use crate::handlers::{ErasedHandle, OwnerId, Verdict};

/// Outcome of a single handler invocation, as seen by the delivery loop.
#[derive(Debug)]
pub enum Delivery {
    /// Handler ran and passed.
    Delivered,
    /// Handler ran and vetoed the rest of this dispatch.
    Vetoed,
    /// Handler failed or panicked; already contained, report and move on.
    Failed(HandlerError),
}

/// Immutable registration record stored in a priority bucket.
///
/// Entries are cheap to clone (the target is shared); the pool strategy
/// clones them out of the queue to run each on its own task.
#[derive(Clone)]
pub struct HandlerEntry {
    target: Arc<dyn ErasedHandle>,
    owner: OwnerId,
    priority: i32,
    vetoable: bool,
    deadline_exempt: bool,
}

impl HandlerEntry {
    pub(crate) fn new(
        target: Arc<dyn ErasedHandle>,
        owner: OwnerId,
        priority: i32,
        vetoable: bool,
        deadline_exempt: bool,
    ) -> Self {
        Self { target, owner, priority, vetoable, deadline_exempt }
    }

    /// Owner this entry was registered under.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Delivery priority; higher runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether an earlier veto skips this entry.
    pub fn vetoable(&self) -> bool {
        self.vetoable
    }

    /// Whether an exceeded deadline is ignored for this entry.
    pub fn deadline_exempt(&self) -> bool {
        self.deadline_exempt
    }

    /// Handler name, for diagnostics.
    pub fn target_name(&self) -> &str {
        self.target.name()
    }

    /// Checks whether this entry is eligible right now.
    ///
    /// The three skip conditions, in order:
    /// 1. the dispatch carries a priority floor and this entry sits below it;
    /// 2. the dispatch was vetoed and this entry is vetoable;
    /// 3. the dispatch carries a deadline, this entry is not exempt, and the
    ///    budget measured from `start` is already spent.
    ///
    /// Pure with respect to the entry: the caller supplies the dispatch-local
    /// state, which is what lets the pool strategy re-evaluate eligibility at
    /// the moment a task actually runs rather than at submission time.
    pub fn can_invoke(&self, policy: &DeliverPolicy, vetoed: bool, start: Instant) -> bool {
        if let Some(floor) = policy.floor {
            if self.priority < floor {
                trace!(handler = self.target_name(), floor, "skipping handler: below priority floor");
                return false;
            }
        }

        if vetoed && self.vetoable {
            trace!(handler = self.target_name(), "skipping handler: dispatch vetoed");
            return false;
        }

        if let Some(deadline) = policy.deadline {
            if !self.deadline_exempt && start.elapsed() > deadline {
                trace!(handler = self.target_name(), ?deadline, "skipping handler: deadline exceeded");
                return false;
            }
        }

        true
    }

    /// Invokes the target with the event.
    ///
    /// Never returns an error and never panics: failures and panics are
    /// folded into [`Delivery::Failed`] so a broken handler cannot take the
    /// rest of the dispatch down with it.
    pub async fn notify(&self, event: &ErasedEvent) -> Delivery {
        trace!(handler = self.target_name(), "notifying handler");

        let fut = self.target.on_event(event.as_ref());
        match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(Verdict::Pass)) => Delivery::Delivered,
            Ok(Ok(Verdict::Veto)) => Delivery::Vetoed,
            Ok(Err(err)) => Delivery::Failed(err),
            Err(panic) => Delivery::Failed(HandlerError::Panicked {
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("target", &self.target_name())
            .field("priority", &self.priority)
            .field("vetoable", &self.vetoable)
            .field("deadline_exempt", &self.deadline_exempt)
            .finish()
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::events::Event;
    use crate::handlers::{HandlerFn, HandlerRef, HandlerSpec, Verdict};

    struct Ping;
    impl Event for Ping {}

    fn entry(priority: i32, vetoable: bool, deadline_exempt: bool) -> HandlerEntry {
        let h: HandlerRef<Ping> = HandlerFn::arc("noop", |_: &Ping| async move {
            Ok::<_, HandlerError>(Verdict::Pass)
        });
        HandlerSpec::new(OwnerId::next(), h)
            .priority(priority)
            .vetoable(vetoable)
            .deadline_exempt(deadline_exempt)
            .into_entry()
    }

    #[test]
    fn test_floor_skips_lower_priority() {
        let e = entry(0, true, false);
        let policy = DeliverPolicy::with_floor(10);
        assert!(!e.can_invoke(&policy, false, Instant::now()));

        let e = entry(10, true, false);
        assert!(e.can_invoke(&policy, false, Instant::now()));
    }

    #[test]
    fn test_veto_skips_only_vetoable() {
        let policy = DeliverPolicy::unbounded();
        let start = Instant::now();

        assert!(!entry(0, true, false).can_invoke(&policy, true, start));
        assert!(entry(0, false, false).can_invoke(&policy, true, start));
        assert!(entry(0, true, false).can_invoke(&policy, false, start));
    }

    #[test]
    fn test_deadline_spares_exempt_entries() {
        let policy = DeliverPolicy::with_deadline(Duration::from_millis(5));
        let expired = Instant::now() - Duration::from_millis(200);

        assert!(!entry(0, true, false).can_invoke(&policy, false, expired));
        assert!(entry(0, true, true).can_invoke(&policy, false, expired));
        // Fresh dispatch: budget not spent yet.
        assert!(entry(0, true, false).can_invoke(&policy, false, Instant::now()));
    }

    #[tokio::test]
    async fn test_notify_maps_verdicts_and_failures() {
        let event: ErasedEvent = Arc::new(Ping);

        let pass: HandlerRef<Ping> = HandlerFn::arc("pass", |_: &Ping| async move {
            Ok::<_, HandlerError>(Verdict::Pass)
        });
        let e = HandlerSpec::new(OwnerId::next(), pass).into_entry();
        assert!(matches!(e.notify(&event).await, Delivery::Delivered));

        let veto: HandlerRef<Ping> = HandlerFn::arc("veto", |_: &Ping| async move {
            Ok::<_, HandlerError>(Verdict::Veto)
        });
        let e = HandlerSpec::new(OwnerId::next(), veto).into_entry();
        assert!(matches!(e.notify(&event).await, Delivery::Vetoed));

        let fail: HandlerRef<Ping> = HandlerFn::arc("fail", |_: &Ping| async move {
            Err::<Verdict, _>(HandlerError::fail("boom"))
        });
        let e = HandlerSpec::new(OwnerId::next(), fail).into_entry();
        assert!(matches!(e.notify(&event).await, Delivery::Failed(_)));
    }

    #[tokio::test]
    async fn test_notify_contains_panics() {
        let event: ErasedEvent = Arc::new(Ping);

        let panicky: HandlerRef<Ping> = HandlerFn::arc("panicky", |_: &Ping| async move {
            if true {
                panic!("kaboom");
            }
            Ok::<_, HandlerError>(Verdict::Pass)
        });
        let e = HandlerSpec::new(OwnerId::next(), panicky).into_entry();

        match e.notify(&event).await {
            Delivery::Failed(HandlerError::Panicked { message }) => {
                assert!(message.contains("kaboom"));
            }
            other => panic!("expected panic delivery, got {other:?}"),
        }
    }
}
