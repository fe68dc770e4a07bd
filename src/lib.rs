//! ticktimer - thread-backed periodic and single-shot callback timer
//!
//! A [`Timer`] calls a zero-argument callback from its own background
//! thread, every `interval` or exactly once, optionally after an initial
//! `delay`. It is meant for code that needs "call this every N" without an
//! event loop or scheduler framework.
//!
//! ## Design Principles
//!
//! 1. **Shared state, detached thread**: the background thread owns a
//!    reference-counted handle to the timer's state, so the `Timer` can be
//!    dropped at any time without leaving the thread dangling.
//! 2. **Live reconfiguration**: interval, delay, mode and callback can be
//!    changed while the timer runs and apply from the next iteration.
//! 3. **Total control surface**: `start`, `stop` and the accessors never
//!    fail; a panicking callback stops the timer and is reported through
//!    [`Timer::last_error`] and the log.
//!
//! ```no_run
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ticktimer::Timer;
//!
//! let count = Arc::new(AtomicU64::new(0));
//! let counter = Arc::clone(&count);
//! let timer = Timer::new(
//!     move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     },
//!     Duration::from_millis(500),
//! );
//! timer.start();
//! std::thread::sleep(Duration::from_millis(1100));
//! timer.stop();
//! ```

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod time_unit;
pub mod timer;
pub mod utils;

pub use config::{Config, LoggingConfig, TimerConfig};
pub use error::{Result, TimerError};
pub use time_unit::TimeUnit;
pub use timer::{Callback, Timer, TimerBuilder};
