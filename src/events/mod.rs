//! Event data model: marker trait, per-type queues, delivery policy.
//!
//! This module groups everything a dispatch operates on:
//!
//! ## Contents
//! - [`Event`] marker trait and [`ErasedEvent`] payload alias
//! - [`EventQueue`] priority-bucketed registry plus the delivery algorithm
//! - [`HandlerEntry`] immutable registration record, [`Delivery`] invocation
//!   outcome
//! - [`DeliverPolicy`] per-dispatch floor/deadline options
//! - [`priority`] conventional priority bands
//!
//! ## Quick reference
//! - **Writers**: `Bus::add_handler` / `Bus::remove_all` mutate queues;
//!   `Bus::declare` / `Bus::remove` manage queue lifecycle.
//! - **Readers**: the dispatch strategies call [`EventQueue::deliver`] (inline,
//!   worker) or [`EventQueue::snapshot`] (pool).

mod entry;
mod event;
mod policy;
pub mod priority;
mod queue;

pub use entry::{Delivery, HandlerEntry};
pub use event::{ErasedEvent, Event};
pub use policy::DeliverPolicy;
pub use queue::EventQueue;
