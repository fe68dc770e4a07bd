//! Run-state word shared between a timer and its background thread
//!
//! The low bit is the running flag, the remaining bits count runs. Every
//! `start()` opens a new run, so a background thread left over from an
//! earlier run (stopped and restarted while it was still asleep) sees a
//! different generation and retires instead of ticking alongside the new one.

use std::sync::atomic::{AtomicU64, Ordering};

const RUNNING: u64 = 1;

pub(crate) struct RunState {
    word: AtomicU64,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            word: AtomicU64::new(0),
        }
    }

    /// Open a new run. Returns its generation, or `None` if a run is active.
    pub(crate) fn begin(&self) -> Option<u64> {
        let mut current = self.word.load(Ordering::Acquire);
        loop {
            if current & RUNNING != 0 {
                return None;
            }
            let generation = (current >> 1).wrapping_add(1);
            let next = (generation << 1) | RUNNING;
            match self.word.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(generation & (u64::MAX >> 1)),
                Err(actual) => current = actual,
            }
        }
    }

    /// Clear the running flag. Returns whether a run was active.
    pub(crate) fn stop(&self) -> bool {
        self.word.fetch_and(!RUNNING, Ordering::AcqRel) & RUNNING != 0
    }

    /// End run `generation` from the background thread. Has no effect if the
    /// run was already stopped or superseded.
    pub(crate) fn finish(&self, generation: u64) -> bool {
        let active = (generation << 1) | RUNNING;
        self.word
            .compare_exchange(active, generation << 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether run `generation` is still the active one
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.word.load(Ordering::Acquire) == (generation << 1) | RUNNING
    }

    pub(crate) fn is_running(&self) -> bool {
        self.word.load(Ordering::Acquire) & RUNNING != 0
    }
}
