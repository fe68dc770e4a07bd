//! Background thread body: initial delay, then sleep/invoke until stopped

use super::shared::WorkerGuard;
use std::time::Duration;
use tracing::{debug, error, trace};

/// Drive run `generation` until it is stopped, superseded, completes as a
/// single shot, or its callback panics.
///
/// Each iteration re-reads the interval and the single-shot flag, so changes
/// made while the timer runs apply from the next iteration on. The stop
/// check before the invoke is the last point a stop can prevent a tick; a
/// callback that has started always runs to completion. A thread from an
/// earlier run that is still inside the callback is waited out first.
pub(crate) fn run(guard: WorkerGuard, generation: u64, delay: Duration) {
    guard.enter();
    let shared = guard.shared();
    let name = shared.label();

    if !delay.is_zero() && !shared.sleep_while_current(generation, delay) {
        debug!(timer = name, generation, "Timer stopped during initial delay");
        return;
    }

    loop {
        let interval = shared.interval();

        if !shared.state.is_current(generation) {
            break;
        }
        if !interval.is_zero() && !shared.sleep_while_current(generation, interval) {
            break;
        }
        if !shared.wait_sole_worker(generation) {
            break;
        }

        if let Err(e) = shared.invoke() {
            error!(timer = name, generation, "Timer callback failed, stopping: {}", e);
            shared.record_error(e);
            shared.end_run(generation);
            return;
        }
        trace!(timer = name, generation, ticks = shared.ticks(), "Timer fired");

        if shared.single_shot() {
            shared.end_run(generation);
            debug!(timer = name, generation, "Single-shot timer completed");
            return;
        }
    }

    shared.end_run(generation);
    debug!(timer = name, generation, "Timer loop exited");
}
