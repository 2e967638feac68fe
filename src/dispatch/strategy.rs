//! # Execution strategy contract.
//!
//! [`Dispatch`] is the polymorphic backend the [`Bus`](crate::Bus) hands a
//! resolved `(queue, event, policy)` triple to. The bus does not care *where*
//! handlers run; the strategy decides:
//!
//! | Strategy                                       | `push` returns          | Runs handlers on        |
//! |------------------------------------------------|-------------------------|-------------------------|
//! | [`InlineDispatch`](crate::InlineDispatch)      | after all handlers ran  | the caller's task       |
//! | [`WorkerDispatch`](crate::WorkerDispatch)      | immediately (FIFO)      | one dedicated worker    |
//! | [`PoolDispatch`](crate::PoolDispatch)          | once tasks are spawned  | one task per handler    |
//!
//! Whatever the backend, eligibility is always evaluated through
//! [`HandlerEntry::can_invoke`](crate::HandlerEntry::can_invoke), so veto and
//! deadline semantics are identical across strategies.

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::{DeliverPolicy, ErasedEvent, EventQueue};

/// Execution backend for one dispatch.
#[async_trait]
pub trait Dispatch: Send + Sync + 'static {
    /// Dispatches `event` to the handlers registered in `queue`.
    ///
    /// Completion of this call means what the strategy defines it to mean —
    /// only the inline strategy guarantees the handlers have already run.
    async fn push(&self, queue: Arc<EventQueue>, event: ErasedEvent, policy: DeliverPolicy);
}
