//! # Handler registration specification.
//!
//! [`HandlerSpec`] is the unit the registration side hands to
//! [`Bus::add_handler`](crate::Bus::add_handler): a typed handler plus the
//! flags that govern its place in the dispatch.
//!
//! ## Defaults
//! - `priority = priority::NORMAL` (0)
//! - `vetoable = true` (a veto from an earlier handler skips this one)
//! - `deadline_exempt = false` (an exceeded deadline skips this one)
//!
//! ## Example
//! ```
//! use priobus::{priority, Event, HandlerError, HandlerFn, HandlerRef, HandlerSpec, OwnerId, Verdict};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! let h: HandlerRef<Ping> = HandlerFn::arc("gate", |_: &Ping| async move {
//!     Ok::<_, HandlerError>(Verdict::Veto)
//! });
//!
//! let spec = HandlerSpec::new(OwnerId::next(), h)
//!     .priority(priority::HIGH)
//!     .vetoable(false);
//! ```

use std::sync::Arc;

use crate::events::{priority, Event, HandlerEntry};
use crate::handlers::handle::{HandlerRef, TypedHandle};
use crate::handlers::owner::OwnerId;

/// Registration record for one handler on one event type.
///
/// Immutable once registered; changing a flag means deregistering and
/// registering again. The same handler may be registered any number of
/// times — entries are never deduplicated, each registration is notified
/// independently.
pub struct HandlerSpec<E: Event> {
    handler: HandlerRef<E>,
    owner: OwnerId,
    priority: i32,
    vetoable: bool,
    deadline_exempt: bool,
}

impl<E: Event> HandlerSpec<E> {
    /// Creates a spec with default flags.
    pub fn new(owner: OwnerId, handler: HandlerRef<E>) -> Self {
        Self {
            handler,
            owner,
            priority: priority::NORMAL,
            vetoable: true,
            deadline_exempt: false,
        }
    }

    /// Sets the delivery priority; higher runs first.
    ///
    /// See the [`priority`](crate::priority) constants for the conventional
    /// bands.
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Controls whether an earlier veto skips this handler.
    ///
    /// Non-vetoable handlers run even after a veto; use this for handlers
    /// that must observe every event (audit, accounting).
    #[must_use]
    pub fn vetoable(mut self, vetoable: bool) -> Self {
        self.vetoable = vetoable;
        self
    }

    /// Controls whether an exceeded deadline skips this handler.
    ///
    /// Exempt handlers run even when the dispatch is over budget.
    #[must_use]
    pub fn deadline_exempt(mut self, deadline_exempt: bool) -> Self {
        self.deadline_exempt = deadline_exempt;
        self
    }

    /// Erases the event type and produces the queue-internal entry.
    pub(crate) fn into_entry(self) -> HandlerEntry {
        HandlerEntry::new(
            Arc::new(TypedHandle::new(self.handler)),
            self.owner,
            self.priority,
            self.vetoable,
            self.deadline_exempt,
        )
    }
}
