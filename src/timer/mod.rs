//! Periodic and single-shot callback timer
//!
//! A [`Timer`] runs a zero-argument callback on its own background thread,
//! either repeatedly every `interval` or once, optionally after an initial
//! `delay`. Interval, delay, mode and callback can all be changed while the
//! timer runs.

mod shared;
mod state;
pub mod timer;
mod worker;

pub use timer::{Timer, TimerBuilder};

use std::sync::Arc;

/// Callback invoked on every tick
pub type Callback = Arc<dyn Fn() + Send + Sync + 'static>;
