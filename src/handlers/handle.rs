//! # Handler trait and invocation verdicts.
//!
//! This module defines [`Handle`], the async trait implemented by event
//! consumers, and [`Verdict`], the tagged result a handler returns to steer
//! the rest of the dispatch.
//!
//! A veto is *not* an error and does not travel on the error channel: a
//! handler that wants to suppress the remaining vetoable handlers of the
//! current dispatch returns `Ok(Verdict::Veto)`. Failures go through
//! `Err(HandlerError)` (or a panic, which the dispatcher catches) and never
//! affect sibling handlers.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use priobus::{Event, Handle, HandlerError, Verdict};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Handle<Ping> for Audit {
//!     async fn on_event(&self, _event: &Ping) -> Result<Verdict, HandlerError> {
//!         // record the ping...
//!         Ok(Verdict::Pass)
//!     }
//!
//!     fn name(&self) -> &str { "audit" }
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::events::Event;

/// What a successful handler invocation tells the dispatch loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Continue with the remaining handlers.
    Pass,
    /// Suppress the remaining *vetoable* handlers of this dispatch.
    ///
    /// Scoped to the single in-flight dispatch; non-vetoable handlers and
    /// later pushes are unaffected.
    Veto,
}

/// # Typed event handler.
///
/// Registered against exactly one event type through
/// [`HandlerSpec`](crate::HandlerSpec). Invocations happen on whichever
/// execution context the bus's dispatch strategy provides: the producer's
/// task (inline), a dedicated worker, or a pooled task.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Return `Err` rather than panicking; panics are caught but reported as a
///   degraded diagnostic.
/// - Under the pool strategy the same handler may run concurrently with
///   other handlers for the same event instance.
#[async_trait]
pub trait Handle<E: Event>: Send + Sync + 'static {
    /// Processes a single event and returns a [`Verdict`].
    async fn on_event(&self, event: &E) -> Result<Verdict, HandlerError>;

    /// Returns the handler name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a typed handler (`Arc<dyn Handle<E>>`).
pub type HandlerRef<E> = Arc<dyn Handle<E>>;

/// Type-erased view of a handler, as stored in a queue entry.
///
/// The typed registration surface guarantees the downcast in
/// [`TypedHandle`] succeeds; the erased trait exists so entries for
/// different event types share one representation inside the bus.
#[async_trait]
pub(crate) trait ErasedHandle: Send + Sync {
    async fn on_event(&self, event: &(dyn Any + Send + Sync)) -> Result<Verdict, HandlerError>;

    fn name(&self) -> &str;
}

/// Adapter carrying a typed handler behind the erased interface.
pub(crate) struct TypedHandle<E: Event> {
    inner: HandlerRef<E>,
}

impl<E: Event> TypedHandle<E> {
    pub(crate) fn new(inner: HandlerRef<E>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: Event> ErasedHandle for TypedHandle<E> {
    async fn on_event(&self, event: &(dyn Any + Send + Sync)) -> Result<Verdict, HandlerError> {
        match event.downcast_ref::<E>() {
            Some(event) => self.inner.on_event(event).await,
            None => Err(HandlerError::TypeMismatch {
                expected: std::any::type_name::<E>(),
            }),
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
