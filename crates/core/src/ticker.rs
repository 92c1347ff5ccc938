//! Ticker module - a pausable repeating timer running on its own thread
//!
//! A [`Ticker`] calls its callback once per `interval`. The worker thread is
//! spawned on the first `start()` and sleeps on a condition variable until the
//! next fire time or until a control call wakes it up.
//!
//! Timing rules:
//!
//! - Fire times are absolute (`next_call += interval`), so they do not drift with
//!   callback duration. When the callback overruns whole periods the missed
//!   firings are skipped instead of being delivered in a burst.
//! - The next firing is armed before the callback runs. A callback that pauses,
//!   stops or replaces its own ticker therefore never races the rescheduling.
//! - `pause()` records the pause instant; `resume()` pushes the pending fire time
//!   back by the time spent paused, so the phase inside the interval survives.
//!
//! Every callback receives a [`TickStamp`]. The epoch in the stamp changes on each
//! pause and stop, which lets the receiver discard a tick that was already in
//! flight when the ticker was halted.
//!
//! Dropping a ticker shuts its thread down without joining it, so a ticker may be
//! dropped from inside its own callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

static NEXT_TICKER_ID: AtomicU64 = AtomicU64::new(1);

/// Callback invoked on the ticker thread
pub type TickCallback = Box<dyn FnMut(TickStamp) + Send + 'static>;

/// Lifecycle of a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerState {
    /// Created, never started
    Initiated,
    Running,
    Paused,
    Stopped,
}

/// Identifies which ticker run produced a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickStamp {
    pub ticker_id: u64,
    pub epoch: u64,
}

#[derive(Debug)]
struct Control {
    state: TickerState,
    interval: Duration,
    next_call: Instant,
    pause_time: Option<Instant>,
    epoch: u64,
    shutdown: bool,
}

#[derive(Debug)]
struct Shared {
    control: Mutex<Control>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Ticker {
    id: u64,
    shared: Arc<Shared>,
    /// Taken by the worker thread on first start
    callback: Mutex<Option<TickCallback>>,
}

impl Ticker {
    /// Create a stopped ticker. Panics if `interval` is zero.
    pub fn new(interval: Duration, callback: impl FnMut(TickStamp) + Send + 'static) -> Self {
        assert!(!interval.is_zero(), "ticker interval must be positive");
        Self {
            id: NEXT_TICKER_ID.fetch_add(1, Ordering::Relaxed),
            shared: Arc::new(Shared {
                control: Mutex::new(Control {
                    state: TickerState::Initiated,
                    interval,
                    next_call: Instant::now(),
                    pause_time: None,
                    epoch: 0,
                    shutdown: false,
                }),
                wake: Condvar::new(),
            }),
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Start firing. A fresh or stopped ticker fires one full interval from now;
    /// a paused ticker resumes with its phase intact. No-op when running.
    pub fn start(&self) {
        let mut control = self.shared.lock();
        match control.state {
            TickerState::Running => return,
            TickerState::Paused => {
                drop(control);
                self.resume();
                return;
            }
            TickerState::Initiated | TickerState::Stopped => {
                control.next_call = Instant::now() + control.interval;
                control.state = TickerState::Running;
            }
        }
        drop(control);

        self.ensure_worker();
        self.shared.wake.notify_all();
        debug!(ticker = self.id, "ticker started");
    }

    /// Cancel the pending fire. The interval and callback are kept.
    pub fn stop(&self) {
        let mut control = self.shared.lock();
        if control.state == TickerState::Stopped {
            return;
        }
        control.state = TickerState::Stopped;
        control.pause_time = None;
        control.epoch += 1;
        drop(control);

        self.shared.wake.notify_all();
        debug!(ticker = self.id, "ticker stopped");
    }

    /// Cancel the pending fire and remember when. No-op unless running, so a
    /// second pause keeps the first pause instant.
    pub fn pause(&self) {
        let mut control = self.shared.lock();
        if control.state != TickerState::Running {
            return;
        }
        control.state = TickerState::Paused;
        control.pause_time = Some(Instant::now());
        control.epoch += 1;
        drop(control);

        self.shared.wake.notify_all();
    }

    /// Continue after a pause, delaying the pending fire by the paused time.
    /// No-op when running; starts a fresh or stopped ticker.
    pub fn resume(&self) {
        let mut control = self.shared.lock();
        match control.state {
            TickerState::Running => return,
            TickerState::Initiated | TickerState::Stopped => {
                drop(control);
                self.start();
                return;
            }
            TickerState::Paused => {
                let now = Instant::now();
                let paused_for = control
                    .pause_time
                    .take()
                    .map(|t| now.saturating_duration_since(t))
                    .unwrap_or_default();
                control.next_call += paused_for;
                control.state = TickerState::Running;
            }
        }
        drop(control);

        self.shared.wake.notify_all();
    }

    /// Change the period. The pending fire moves so that it lands one new
    /// interval after the previous fire (never earlier than now).
    pub fn set_interval(&self, interval: Duration) {
        assert!(!interval.is_zero(), "ticker interval must be positive");
        let mut control = self.shared.lock();
        let last_armed = control
            .next_call
            .checked_sub(control.interval)
            .unwrap_or(control.next_call);
        control.interval = interval;
        if control.state == TickerState::Running {
            control.next_call = (last_armed + interval).max(Instant::now());
        }
        drop(control);

        self.shared.wake.notify_all();
    }

    pub fn interval(&self) -> Duration {
        self.shared.lock().interval
    }

    pub fn state(&self) -> TickerState {
        self.shared.lock().state
    }

    pub fn epoch(&self) -> u64 {
        self.shared.lock().epoch
    }

    pub fn is_running(&self) -> bool {
        self.state() == TickerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == TickerState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state(), TickerState::Stopped | TickerState::Initiated)
    }

    /// Time left until the pending fire. While paused this is the remainder
    /// frozen at the pause instant.
    pub fn next_fire_in(&self) -> Option<Duration> {
        let control = self.shared.lock();
        match control.state {
            TickerState::Running => Some(control.next_call.saturating_duration_since(Instant::now())),
            TickerState::Paused => control
                .pause_time
                .map(|t| control.next_call.saturating_duration_since(t)),
            TickerState::Initiated | TickerState::Stopped => None,
        }
    }

    fn ensure_worker(&self) {
        let mut slot = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(callback) = slot.take() else {
            return;
        };

        let shared = Arc::clone(&self.shared);
        let id = self.id;
        let spawned = thread::Builder::new()
            .name(format!("ticker-{}", id))
            .spawn(move || run_worker(shared, id, callback));
        if let Err(e) = spawned {
            warn!(ticker = id, error = %e, "failed to spawn ticker thread");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
    }
}

impl std::fmt::Debug for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let control = self.shared.lock();
        f.debug_struct("Ticker")
            .field("id", &self.id)
            .field("state", &control.state)
            .field("interval", &control.interval)
            .field("epoch", &control.epoch)
            .finish()
    }
}

fn run_worker(shared: Arc<Shared>, id: u64, mut callback: TickCallback) {
    let mut control = shared.lock();
    loop {
        if control.shutdown {
            debug!(ticker = id, "ticker thread exiting");
            return;
        }

        if control.state != TickerState::Running {
            control = shared
                .wake
                .wait(control)
                .unwrap_or_else(PoisonError::into_inner);
            continue;
        }

        let now = Instant::now();
        if now < control.next_call {
            let timeout = control.next_call - now;
            control = shared
                .wake
                .wait_timeout(control, timeout)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
            continue;
        }

        // Arm the next fire before running the callback.
        let interval = control.interval;
        control.next_call += interval;
        if control.next_call <= now {
            control.next_call = now + interval;
        }
        let stamp = TickStamp {
            ticker_id: id,
            epoch: control.epoch,
        };
        drop(control);

        callback(stamp);

        control = shared.lock();
    }
}
