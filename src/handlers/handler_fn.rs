//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(&E) -> Fut`, producing a fresh future
//! per invocation. This avoids shared mutable state; if a handler needs
//! state across invocations, capture an `Arc<...>` explicitly inside the
//! closure.
//!
//! The returned future is independent of the event borrow: read what you
//! need from `&E` while building the future, then move owned data into the
//! `async move` block.
//!
//! ## Example
//! ```
//! use priobus::{Event, Handle, HandlerError, HandlerFn, HandlerRef, Verdict};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! let h: HandlerRef<Ping> = HandlerFn::arc("greeter", |_: &Ping| async move {
//!     // do work...
//!     Ok::<_, HandlerError>(Verdict::Pass)
//! });
//!
//! assert_eq!(h.name(), "greeter");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::HandlerError;
use crate::events::Event;
use crate::handlers::handle::{Handle, Verdict};

/// Function-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a
    /// [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<E, F, Fut> Handle<E> for HandlerFn<F>
where
    E: Event,
    F: Fn(&E) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<Verdict, HandlerError>> + Send + 'static,
{
    async fn on_event(&self, event: &E) -> Result<Verdict, HandlerError> {
        (self.f)(event).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
