//! # Per-dispatch delivery policy.
//!
//! [`DeliverPolicy`] carries the two optional knobs a producer can attach to
//! a single push:
//!
//! - **floor** — minimum priority; entries below it are skipped for this
//!   dispatch only.
//! - **deadline** — soft elapsed-time budget measured from the start of
//!   processing. Once exceeded, remaining non-exempt handlers are skipped;
//!   a handler already running is never interrupted.
//!
//! Exactly one of the two is set per push call (the [`Bus`](crate::Bus)
//! surface exposes them as separate methods); the delivery algorithm itself
//! is written against the combined policy so there is only one loop.

use std::time::Duration;

/// Options applied to a single dispatch.
///
/// The default policy is unbounded: no priority floor, no deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeliverPolicy {
    /// Minimum priority notified by this dispatch (`None` = no floor).
    pub floor: Option<i32>,
    /// Soft time budget for this dispatch (`None` = unbounded).
    pub deadline: Option<Duration>,
}

impl DeliverPolicy {
    /// Policy with no floor and no deadline.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Policy with a soft deadline.
    ///
    /// A zero duration means "no deadline", mirroring the producer-facing
    /// convention that an absent or non-positive deadline is unbounded.
    #[must_use]
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            floor: None,
            deadline: if deadline.is_zero() { None } else { Some(deadline) },
        }
    }

    /// Policy notifying only entries at or above `floor`.
    #[must_use]
    pub fn with_floor(floor: i32) -> Self {
        Self { floor: Some(floor), deadline: None }
    }
}
