use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::bus::{Bus, BusInner};
use crate::dispatch::{Dispatch, InlineDispatch};

/// Builder for constructing a [`Bus`] with a chosen execution strategy.
pub struct BusBuilder {
    dispatch: Arc<dyn Dispatch>,
}

impl BusBuilder {
    /// Creates a builder with the default inline strategy.
    #[must_use]
    pub fn new() -> Self {
        Self { dispatch: Arc::new(InlineDispatch::new()) }
    }

    /// Sets the execution strategy the bus delegates every push to.
    ///
    /// ## Example
    /// ```
    /// use std::sync::Arc;
    /// use priobus::{Bus, WorkerDispatch};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let bus = Bus::builder()
    ///     .with_dispatch(Arc::new(WorkerDispatch::new()))
    ///     .build();
    /// # let _ = bus;
    /// # }
    /// ```
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Arc<dyn Dispatch>) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Builds the bus.
    pub fn build(self) -> Bus {
        Bus::from_inner(BusInner {
            queues: RwLock::new(HashMap::new()),
            dispatch: self.dispatch,
        })
    }
}

impl Default for BusBuilder {
    fn default() -> Self {
        Self::new()
    }
}
