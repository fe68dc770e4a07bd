//! State block shared by a `Timer` and its background thread
//!
//! The background thread holds its own `Arc` to this block, so dropping the
//! `Timer` never leaves the thread pointing at freed state: it observes the
//! stop, finishes its current step and releases its reference.

use super::state::RunState;
use super::Callback;
use crate::error::TimerError;
use crate::time_unit::{saturating_nanos, TimeUnit};
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

thread_local! {
    /// Address of the `Shared` block a background thread serves; 0 elsewhere
    static CURRENT_TIMER: Cell<usize> = const { Cell::new(0) };
}

pub(crate) struct Shared {
    pub(crate) name: Option<String>,
    pub(crate) unit: TimeUnit,
    pub(crate) state: RunState,
    single_shot: AtomicBool,
    interval_nanos: AtomicU64,
    delay_nanos: AtomicU64,
    callback: Mutex<Callback>,
    last_error: Mutex<Option<TimerError>>,
    ticks: AtomicU64,
    panics: AtomicU64,
    /// Background threads that have not exited yet
    workers: AtomicUsize,
    /// Guards sleeps and waits on `wake`; protects no data
    signal: Mutex<()>,
    wake: Condvar,
}

/// Lock a mutex, recovering the data if a previous holder panicked.
///
/// None of the values behind these mutexes can be left half-written by a
/// panic (they are replaced whole), so the poison flag carries no meaning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    pub(crate) fn new(
        callback: Callback,
        interval: Duration,
        delay: Duration,
        single_shot: bool,
        unit: TimeUnit,
        name: Option<String>,
    ) -> Self {
        Self {
            name,
            unit,
            state: RunState::new(),
            single_shot: AtomicBool::new(single_shot),
            interval_nanos: AtomicU64::new(saturating_nanos(interval)),
            delay_nanos: AtomicU64::new(saturating_nanos(delay)),
            callback: Mutex::new(callback),
            last_error: Mutex::new(None),
            ticks: AtomicU64::new(0),
            panics: AtomicU64::new(0),
            workers: AtomicUsize::new(0),
            signal: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    pub(crate) fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("timer")
    }

    pub(crate) fn interval_nanos(&self) -> u64 {
        self.interval_nanos.load(Ordering::Acquire)
    }

    pub(crate) fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos())
    }

    pub(crate) fn set_interval(&self, interval: Duration) {
        self.interval_nanos
            .store(saturating_nanos(interval), Ordering::Release);
    }

    pub(crate) fn delay_nanos(&self) -> u64 {
        self.delay_nanos.load(Ordering::Acquire)
    }

    pub(crate) fn delay(&self) -> Duration {
        Duration::from_nanos(self.delay_nanos())
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        self.delay_nanos
            .store(saturating_nanos(delay), Ordering::Release);
    }

    pub(crate) fn single_shot(&self) -> bool {
        self.single_shot.load(Ordering::Acquire)
    }

    pub(crate) fn set_single_shot(&self, single_shot: bool) {
        self.single_shot.store(single_shot, Ordering::Release);
    }

    pub(crate) fn callback(&self) -> Callback {
        Arc::clone(&lock(&self.callback))
    }

    pub(crate) fn replace_callback(&self, callback: Callback) -> Callback {
        std::mem::replace(&mut *lock(&self.callback), callback)
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    pub(crate) fn panics(&self) -> u64 {
        self.panics.load(Ordering::Acquire)
    }

    pub(crate) fn last_error(&self) -> Option<TimerError> {
        lock(&self.last_error).clone()
    }

    pub(crate) fn take_last_error(&self) -> Option<TimerError> {
        lock(&self.last_error).take()
    }

    pub(crate) fn record_error(&self, error: TimerError) {
        *lock(&self.last_error) = Some(error);
    }

    /// Run the current callback once on the calling thread.
    ///
    /// The callback is cloned out of its slot before the call, so the slot
    /// lock is never held while user code runs and a callback may replace
    /// itself.
    pub(crate) fn invoke(&self) -> Result<(), TimerError> {
        let callback = self.callback();
        match panic::catch_unwind(AssertUnwindSafe(|| callback())) {
            Ok(()) => {
                self.ticks.fetch_add(1, Ordering::AcqRel);
                Ok(())
            }
            Err(payload) => {
                self.panics.fetch_add(1, Ordering::AcqRel);
                Err(TimerError::CallbackPanicked(panic_message(payload.as_ref())))
            }
        }
    }

    /// Sleep for `duration` unless run `generation` ends first.
    ///
    /// Returns `true` if the full duration elapsed with the run still active.
    /// Only `stop()` and a restart wake the sleeper early; a changed interval
    /// does not.
    pub(crate) fn sleep_while_current(&self, generation: u64, duration: Duration) -> bool {
        !self.wait_until(duration, || !self.state.is_current(generation))
    }

    /// Block until no run is active and every background thread has exited,
    /// or `timeout` passes. Returns `true` on the former.
    pub(crate) fn wait_idle(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, || self.is_idle())
    }

    /// Wait on `wake` until `done` holds or `timeout` elapses; returns
    /// whether `done` held. A timeout too large for `Instant` waits forever.
    fn wait_until(&self, timeout: Duration, done: impl Fn() -> bool) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = lock(&self.signal);
        loop {
            if done() {
                return true;
            }
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.wake
                        .wait_timeout(guard, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .wake
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    /// Before invoking for run `generation`, wait until every thread left
    /// over from earlier runs has exited, so invocations never overlap.
    ///
    /// Returns whether the run is still active afterwards.
    pub(crate) fn wait_sole_worker(&self, generation: u64) -> bool {
        if self.workers.load(Ordering::Acquire) > 1 {
            self.wait_until(Duration::MAX, || {
                !self.state.is_current(generation) || self.workers.load(Ordering::Acquire) <= 1
            });
        }
        self.state.is_current(generation)
    }

    /// End run `generation` and wake anyone waiting for the timer to stop.
    pub(crate) fn end_run(&self, generation: u64) -> bool {
        let ended = self.state.finish(generation);
        if ended {
            self.notify();
        }
        ended
    }

    /// Whether the calling thread is one of this timer's background threads
    pub(crate) fn on_worker_thread(&self) -> bool {
        CURRENT_TIMER.with(|current| current.get() == self as *const Shared as usize)
    }

    fn is_idle(&self) -> bool {
        !self.state.is_running() && self.workers.load(Ordering::Acquire) == 0
    }

    /// Wake every sleeper and waiter so they re-check the run state.
    ///
    /// Taking `signal` orders the notification after any sleeper's last
    /// check, so no wakeup is lost.
    pub(crate) fn notify(&self) {
        let _guard = lock(&self.signal);
        self.wake.notify_all();
    }
}

/// Accounts for one live background thread; released when the thread exits,
/// or immediately if it could not be spawned.
pub(crate) struct WorkerGuard {
    shared: Arc<Shared>,
}

impl WorkerGuard {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        shared.workers.fetch_add(1, Ordering::AcqRel);
        Self { shared }
    }

    /// Mark the calling thread as this timer's background thread
    pub(crate) fn enter(&self) {
        let address = Arc::as_ptr(&self.shared) as usize;
        CURRENT_TIMER.with(|current| current.set(address));
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.shared.workers.fetch_sub(1, Ordering::AcqRel);
        self.shared.notify();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
