//! Bus construction and the producer/registration surface.
//!
//! ## Contents
//! - [`Bus`] queue lifecycle (`declare`/`remove`), registration
//!   (`add_handler`/`remove_all`), and the `push` family
//! - [`BusBuilder`] strategy selection
//!
//! ## System wiring
//! ```text
//! registration side                     producer side
//! ─────────────────                     ─────────────
//! bus.declare::<E>()                    bus.push(event)
//! bus.add_handler(spec)                 bus.push_with_deadline(event, d)
//! bus.remove_all(owner)                 bus.push_min_priority(event, p)
//!         │                                     │
//!         ▼                                     ▼
//!   EventQueue buckets  ◄── deliver ──  Dispatch strategy
//! ```

mod builder;
mod bus;

pub use builder::BusBuilder;
pub use bus::Bus;
