//! # Owner identity for bulk deregistration.
//!
//! Every registration names an [`OwnerId`]; `Bus::remove_all(owner)` later
//! strips every entry carrying that id, across all queues, in one call.
//!
//! Identity is reference identity, not equality of the handlers: two
//! registrations of the same closure under different owners are independent,
//! and deregistering one owner leaves the other untouched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Monotonic source for [`OwnerId::next`]. Starts at 1 so that the id space
/// never collides with a null pointer from [`OwnerId::of`].
static NEXT_OWNER: AtomicUsize = AtomicUsize::new(1);

/// Opaque key grouping registrations for bulk removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(usize);

impl OwnerId {
    /// Allocates a fresh, process-unique owner id.
    ///
    /// # Example
    /// ```
    /// use priobus::OwnerId;
    ///
    /// let a = OwnerId::next();
    /// let b = OwnerId::next();
    /// assert_ne!(a, b);
    /// ```
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }

    /// Derives the owner id from the address of a shared owner object.
    ///
    /// Useful when the consumer side already keeps its handlers alive behind
    /// one `Arc`: the same `Arc` yields the same id, so deregistration does
    /// not need to thread a separate token around.
    #[must_use]
    pub fn of<T: ?Sized>(owner: &Arc<T>) -> Self {
        Self(Arc::as_ptr(owner) as *const () as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_is_stable_per_arc() {
        let owner = Arc::new("consumer");
        let clone = Arc::clone(&owner);
        assert_eq!(OwnerId::of(&owner), OwnerId::of(&clone));

        let other = Arc::new("consumer");
        assert_ne!(OwnerId::of(&owner), OwnerId::of(&other));
    }
}
