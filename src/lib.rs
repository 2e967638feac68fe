//! # priobus
//!
//! **Priobus** is a typed in-process publish/subscribe dispatcher for Rust.
//!
//! Producers declare event types on a [`Bus`], consumers register async
//! handlers against those types, and pushed events are delivered to matching
//! handlers in priority order — with support for early termination ("veto")
//! and soft per-dispatch time budgets ("deadlines").
//!
//! ## Architecture
//! ```text
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!  │  producer A  │    │  producer B  │    │ registration │
//!  └──────┬───────┘    └──────┬───────┘    └──────┬───────┘
//!         │ push(event)       │                   │ add_handler(spec)
//!         ▼                   ▼                   ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bus                                                        │
//! │  - queue per declared event type (exact TypeId match)       │
//! │  - Dispatch strategy (inline / worker / pool)               │
//! └──────────────┬──────────────────────────────────────────────┘
//!                ▼
//!        ┌───────────────┐   per-priority buckets, highest first
//!        │  EventQueue   │   ├─ [100] h1, h2    (insertion order)
//!        │   deliver()   │   ├─ [  0] h3
//!        └───────┬───────┘   └─ [-10] h4
//!                ▼
//!         HandlerEntry::can_invoke?  ──► skip (floor / veto / deadline)
//!         HandlerEntry::notify(event)
//!            ├─ Ok(Verdict::Pass)  → continue
//!            ├─ Ok(Verdict::Veto)  → suppress remaining vetoable entries
//!            └─ Err / panic        → report, continue
//! ```
//!
//! ## Delivery semantics
//! - **Priority**: buckets run highest-first; within a bucket, registration
//!   order is the tie-break.
//! - **Veto**: a handler returning [`Verdict::Veto`] suppresses the
//!   remaining *vetoable* handlers of that one dispatch. Non-vetoable
//!   handlers still run.
//! - **Deadline**: a soft, cooperative budget. Once exceeded, remaining
//!   non-exempt handlers are skipped; a running handler is never
//!   interrupted.
//! - **Failure isolation**: a handler error or panic is caught at the
//!   invocation boundary and reported via `tracing`; siblings and the
//!   dispatch itself are unaffected. Producers never observe handler
//!   failures.
//! - **Unknown types**: pushing an event type that was never declared is a
//!   silent no-op.
//!
//! ## Strategies
//! | Strategy           | `push` returns          | Ordering                        |
//! |--------------------|-------------------------|---------------------------------|
//! | [`InlineDispatch`] | after all handlers ran  | strict, caller serializes       |
//! | [`WorkerDispatch`] | immediately             | strict per dispatch, global FIFO|
//! | [`PoolDispatch`]   | once tasks are spawned  | best-effort (parallel handlers) |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use priobus::{priority, Bus, Event, HandlerError, HandlerFn, HandlerRef, HandlerSpec, OwnerId, Verdict};
//!
//! struct Ping;
//! impl Event for Ping {}
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Bus::builder().build();
//!     bus.declare::<Ping>().await;
//!
//!     let seen = Arc::new(Mutex::new(Vec::new()));
//!     let owner = OwnerId::next();
//!
//!     let log = Arc::clone(&seen);
//!     let first: HandlerRef<Ping> = HandlerFn::arc("first", move |_: &Ping| {
//!         let log = Arc::clone(&log);
//!         async move {
//!             log.lock().unwrap().push("first");
//!             Ok::<_, HandlerError>(Verdict::Pass)
//!         }
//!     });
//!     bus.add_handler(HandlerSpec::new(owner, first).priority(priority::HIGH)).await;
//!
//!     let log = Arc::clone(&seen);
//!     let second: HandlerRef<Ping> = HandlerFn::arc("second", move |_: &Ping| {
//!         let log = Arc::clone(&log);
//!         async move {
//!             log.lock().unwrap().push("second");
//!             Ok::<_, HandlerError>(Verdict::Pass)
//!         }
//!     });
//!     bus.add_handler(HandlerSpec::new(owner, second)).await;
//!
//!     bus.push(Ping).await;
//!     assert_eq!(*seen.lock().unwrap(), ["first", "second"]);
//! }
//! ```
//!
//! ## Out of scope
//! Cross-process delivery, persistence of undelivered events, exactly-once
//! semantics, and hard (preemptive) deadline enforcement. Handler discovery
//! is also not this crate's job: whatever resolves "which handlers for which
//! types" hands the bus plain [`HandlerSpec`]s, once per handler per
//! compatible event type.

mod core;
mod dispatch;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use crate::core::{Bus, BusBuilder};
pub use dispatch::{Dispatch, InlineDispatch, PoolDispatch, WorkerDispatch};
pub use error::HandlerError;
pub use events::{priority, DeliverPolicy, Delivery, ErasedEvent, Event, EventQueue, HandlerEntry};
pub use handlers::{Handle, HandlerFn, HandlerRef, HandlerSpec, OwnerId, Verdict};
