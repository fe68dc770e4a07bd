//! Timer front end: construction, control and configuration accessors

use super::shared::{Shared, WorkerGuard};
use super::{worker, Callback};
use crate::config::TimerConfig;
use crate::error::{Result, TimerError};
use crate::time_unit::TimeUnit;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// Thread-backed callback timer
///
/// Created stopped unless auto-start was requested. [`start`](Timer::start)
/// spawns one background thread that sleeps `delay` once, then repeatedly
/// sleeps `interval` and invokes the callback; in single-shot mode it stops
/// itself after the first invocation. [`stop`](Timer::stop) is cooperative:
/// it never interrupts a running callback, but it wakes a sleeping thread so
/// no further tick happens.
///
/// All methods take `&self`; share a timer between threads with `Arc<Timer>`.
/// `Timer` is deliberately not `Clone`. The background thread keeps its own
/// reference to the timer's state, so dropping the `Timer` (which stops it)
/// never invalidates a thread that is still finishing a callback.
pub struct Timer {
    shared: Arc<Shared>,
}

/// Full-control constructor for [`Timer`]
pub struct TimerBuilder {
    callback: Callback,
    interval: Duration,
    delay: Duration,
    single_shot: bool,
    auto_start: bool,
    unit: TimeUnit,
    name: Option<String>,
}

impl TimerBuilder {
    fn new(callback: Callback) -> Self {
        Self {
            callback,
            interval: Duration::ZERO,
            delay: Duration::ZERO,
            single_shot: false,
            auto_start: false,
            unit: TimeUnit::default(),
            name: None,
        }
    }

    /// Wait between ticks (and before the first one)
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// One-time wait before the tick loop begins
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn single_shot(mut self, single_shot: bool) -> Self {
        self.single_shot = single_shot;
        self
    }

    /// Start the timer as soon as it is built
    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Unit used to express interval and delay in the timer's description
    pub fn unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Name shown in log records, the thread name and the description
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Timer {
        let timer = Timer {
            shared: Arc::new(Shared::new(
                self.callback,
                self.interval,
                self.delay,
                self.single_shot,
                self.unit,
                self.name,
            )),
        };
        if self.auto_start {
            timer.start();
        }
        timer
    }
}

impl Timer {
    /// Create a stopped, continuous timer calling `function` every `interval`
    pub fn new<F>(function: F, interval: Duration) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder(function).interval(interval).build()
    }

    /// Create a timer with every option given explicitly
    pub fn with_options<F>(
        function: F,
        interval: Duration,
        delay: Duration,
        single_shot: bool,
        auto_start: bool,
    ) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder(function)
            .interval(interval)
            .delay(delay)
            .single_shot(single_shot)
            .auto_start(auto_start)
            .build()
    }

    /// Create a stopped single-shot timer calling `function` once, `after`
    /// the timer is started
    pub fn once<F>(function: F, after: Duration) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::builder(function)
            .interval(after)
            .single_shot(true)
            .build()
    }

    pub fn builder<F>(function: F) -> TimerBuilder
    where
        F: Fn() + Send + Sync + 'static,
    {
        TimerBuilder::new(Arc::new(function))
    }

    /// Create a timer from configuration, rejecting durations that do not fit
    pub fn from_config<F>(function: F, config: &TimerConfig) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        config.validate()?;
        let mut builder = Self::builder(function)
            .interval(config.interval_duration()?)
            .delay(config.delay_duration()?)
            .single_shot(config.single_shot)
            .auto_start(config.auto_start)
            .unit(config.unit);
        if let Some(name) = &config.name {
            builder = builder.name(name.clone());
        }
        Ok(builder.build())
    }

    /// Start the timer; does nothing if it is already running
    ///
    /// A thread spawn failure is logged and kept as the
    /// [`last_error`](Timer::last_error); the timer stays stopped.
    pub fn start(&self) -> &Self {
        if let Err(e) = self.try_start() {
            error!(timer = self.shared.label(), "Failed to start timer: {}", e);
            self.shared.record_error(e);
        }
        self
    }

    /// Start the timer, reporting whether a new run began
    ///
    /// Returns `Ok(false)` if the timer was already running.
    pub fn try_start(&self) -> Result<bool> {
        let name = self.shared.label();
        let Some(generation) = self.shared.state.begin() else {
            debug!(timer = name, "Timer already running, start ignored");
            return Ok(false);
        };
        // A thread from a previous run may still be asleep; let it retire now
        self.shared.notify();

        let delay = self.shared.delay();
        let guard = WorkerGuard::new(Arc::clone(&self.shared));
        let spawned = thread::Builder::new()
            .name(thread_name(name))
            .spawn(move || worker::run(guard, generation, delay));

        match spawned {
            Ok(_) => {
                debug!(
                    timer = name,
                    generation,
                    interval = ?self.shared.interval(),
                    ?delay,
                    single_shot = self.shared.single_shot(),
                    "Timer started"
                );
                Ok(true)
            }
            Err(e) => {
                // Waiters woken by the guard's release still saw the run open
                self.shared.end_run(generation);
                Err(TimerError::SpawnFailed(e.to_string()))
            }
        }
    }

    /// Ask the timer to stop; does not wait for the background thread
    ///
    /// A callback that is already executing runs to completion.
    pub fn stop(&self) -> &Self {
        if self.shared.state.stop() {
            self.shared.notify();
            debug!(timer = self.shared.label(), "Timer stopped");
        }
        self
    }

    pub fn running(&self) -> bool {
        self.shared.state.is_running()
    }

    pub fn stopped(&self) -> bool {
        !self.running()
    }

    /// Wait until the timer is stopped and its background thread has exited
    ///
    /// Returns `false` if `timeout` elapsed first. Called from the timer's
    /// own callback it returns `false` immediately, since the calling thread
    /// cannot exit while it waits.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        if self.shared.on_worker_thread() {
            return false;
        }
        self.shared.wait_idle(timeout)
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval()
    }

    /// Change the interval; applies from the next wait, never to the one in
    /// progress
    pub fn set_interval(&self, interval: Duration) -> &Self {
        self.shared.set_interval(interval);
        self
    }

    /// Interval as a whole number of display units
    pub fn interval_count(&self) -> u64 {
        self.shared.unit.count(self.shared.interval_nanos())
    }

    pub fn delay(&self) -> Duration {
        self.shared.delay()
    }

    /// Change the initial delay; applies from the next `start()`
    pub fn set_delay(&self, delay: Duration) -> &Self {
        self.shared.set_delay(delay);
        self
    }

    /// Delay as a whole number of display units
    pub fn delay_count(&self) -> u64 {
        self.shared.unit.count(self.shared.delay_nanos())
    }

    pub fn single_shot(&self) -> bool {
        self.shared.single_shot()
    }

    /// Switch between single-shot and continuous mode
    ///
    /// Turning single-shot on while a continuous timer runs ends it after
    /// its next tick.
    pub fn set_single_shot(&self, single_shot: bool) -> &Self {
        self.shared.set_single_shot(single_shot);
        self
    }

    /// Snapshot of the current callback
    pub fn function(&self) -> Callback {
        self.shared.callback()
    }

    /// Replace the callback; the next tick calls `function`
    pub fn set_function<F>(&self, function: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.set_callback(Arc::new(function))
    }

    /// Install an existing callback, e.g. one obtained from
    /// [`function`](Timer::function)
    pub fn set_callback(&self, callback: Callback) -> &Self {
        self.shared.replace_callback(callback);
        self
    }

    pub fn unit(&self) -> TimeUnit {
        self.shared.unit
    }

    pub fn name(&self) -> Option<&str> {
        self.shared.name.as_deref()
    }

    /// Callback invocations that returned normally
    pub fn ticks(&self) -> u64 {
        self.shared.ticks()
    }

    /// Callback invocations that panicked
    pub fn panics(&self) -> u64 {
        self.shared.panics()
    }

    /// Most recent failure recorded by the timer, if any
    pub fn last_error(&self) -> Option<TimerError> {
        self.shared.last_error()
    }

    pub fn take_last_error(&self) -> Option<TimerError> {
        self.shared.take_last_error()
    }
}

/// OS thread name for a timer; std rejects names with NUL bytes
fn thread_name(name: &str) -> String {
    format!("ticktimer-{}", name.replace('\0', ""))
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.shared.unit;
        match self.name() {
            Some(name) => writeln!(f, "Timer \"{name}\"")?,
            None => writeln!(f, "Timer")?,
        }
        writeln!(
            f,
            "  interval:    {}",
            unit.format_nanos(self.shared.interval_nanos())
        )?;
        writeln!(
            f,
            "  delay:       {}",
            unit.format_nanos(self.shared.delay_nanos())
        )?;
        write!(f, "  single shot: {}", self.single_shot())
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name())
            .field("unit", &self.unit())
            .field("running", &self.running())
            .field("single_shot", &self.single_shot())
            .field("interval", &self.interval())
            .field("delay", &self.delay())
            .field("ticks", &self.ticks())
            .finish()
    }
}
