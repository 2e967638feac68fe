//! # Inline strategy: deliver on the caller's task.
//!
//! The simplest correctness model: `push` runs the whole delivery before
//! returning, so the producer observes completion directly and its own
//! pushes trivially serialize. The flip side is that a slow handler blocks
//! the producer for the duration of the dispatch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::strategy::Dispatch;
use crate::events::{DeliverPolicy, ErasedEvent, EventQueue};

/// Synchronous-caller execution strategy.
///
/// This is the default strategy of [`Bus::builder`](crate::Bus::builder).
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDispatch;

impl InlineDispatch {
    /// Creates the inline strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Dispatch for InlineDispatch {
    async fn push(&self, queue: Arc<EventQueue>, event: ErasedEvent, policy: DeliverPolicy) {
        queue.deliver(&event, &policy).await;
    }
}
