//! # Event marker trait and the erased payload type.
//!
//! Producers declare event types on the [`Bus`](crate::Bus) and push plain
//! values of those types. The dispatcher never inspects payloads: events are
//! carried through the strategies as [`ErasedEvent`] (an `Arc<dyn Any>`) and
//! downcast back to the concrete type exactly once, at the registered
//! handler's boundary.
//!
//! Queue lookup is by exact [`TypeId`](std::any::TypeId) — there is no
//! polymorphic matching at dispatch time. If one logical handler should
//! observe several related event types, the registration side adds it to
//! each of those queues (fan-out happens once, at registration).
//!
//! ## Example
//! ```
//! use priobus::Event;
//!
//! struct Ping;
//! impl Event for Ping {}
//! ```

use std::any::Any;
use std::sync::Arc;

/// Marker for types that can be declared and pushed on a [`Bus`](crate::Bus).
///
/// Implement it for plain data types; the dispatcher only requires that the
/// payload is thread-safe and owned (`'static`). Events are shared between
/// handlers by reference, so one pushed instance may be observed concurrently
/// by several handlers under the pool strategy.
pub trait Event: Any + Send + Sync + 'static {}

/// Type-erased, shared event payload as it travels through a strategy.
///
/// Strategies and [`EventQueue`](crate::EventQueue) operate on this alias;
/// the typed view is restored per handler at invocation time.
pub type ErasedEvent = Arc<dyn Any + Send + Sync>;
