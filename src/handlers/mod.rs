//! Handler surface: traits, closures and registration records.
//!
//! ## Contents
//! - [`Handle`] async trait implemented by event consumers, [`Verdict`] its
//!   tagged result (pass / veto)
//! - [`HandlerFn`] closure adapter for quick handlers
//! - [`HandlerSpec`] registration record (priority / vetoable /
//!   deadline-exempt flags)
//! - [`OwnerId`] reference-identity key for bulk deregistration
//!
//! ## Quick wiring
//! ```text
//! HandlerSpec { handler, owner, priority, vetoable, deadline_exempt }
//!      └─► Bus::add_handler() erases the event type
//!           └─► events::entry::HandlerEntry, stored in the queue bucket
//! ```

mod handle;
mod handler_fn;
mod owner;
mod spec;

pub use handle::{Handle, HandlerRef, Verdict};
pub use handler_fn::HandlerFn;
pub use owner::OwnerId;
pub use spec::HandlerSpec;

pub(crate) use handle::{ErasedHandle, TypedHandle};
