//! Execution strategies that run the delivery algorithm.
//!
//! ## Contents
//! - [`Dispatch`] the strategy contract consumed by the bus
//! - [`InlineDispatch`] deliver on the caller's task (default)
//! - [`WorkerDispatch`] unbounded FIFO + one dedicated worker task
//! - [`PoolDispatch`] one task per handler, optional concurrency cap
//!
//! ## Ordering guarantees at a glance
//! ```text
//! within one dispatch        across dispatches
//! Inline  strict (prio/insertion)   producer's own calls serialize
//! Worker  strict (prio/insertion)   global FIFO across producers
//! Pool    submission order only     none
//! ```

mod inline;
mod pool;
mod strategy;
mod worker;

pub use inline::InlineDispatch;
pub use pool::PoolDispatch;
pub use strategy::Dispatch;
pub use worker::WorkerDispatch;
