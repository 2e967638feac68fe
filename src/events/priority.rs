//! Named priority bands for handler registration.
//!
//! Priorities are plain signed integers; higher delivers first. The constants
//! below are caller convention only — the dispatcher never checks that a
//! registration uses one of them, any `i32` works.
//!
//! Handlers that may veto should sit above [`NORMAL`] so that the veto lands
//! before the bulk of the queue runs.

/// Delivered before everything else.
pub const HIGHEST: i32 = 1000;
/// Well above normal; typical slot for veto-capable handlers.
pub const HIGHER: i32 = 100;
/// Above normal.
pub const HIGH: i32 = 10;
/// Default priority for registrations that do not specify one.
pub const NORMAL: i32 = 0;
/// Below normal.
pub const LOW: i32 = -10;
/// Well below normal.
pub const LOWER: i32 = -100;
/// Delivered after everything else.
pub const LOWEST: i32 = -1000;
