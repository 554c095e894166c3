use std::time::Duration;

/// Seconds remaining at which a question countdown enters its final
/// stretch. Presentation only; carries no control-flow effect.
pub const OVERTIME_WARNING_SECS: u64 = 30;

/// Outcome of a single 1 Hz tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Countdown is not running (never started, stopped, or already spent).
    Idle,
    /// Still counting down.
    Running {
        /// Seconds remaining after this tick.
        remaining_secs: u64,
    },
    /// The countdown reached zero on this tick. Fired exactly once.
    Expired,
}

/// A monotonic decreasing 1 Hz countdown with one-shot expiry.
///
/// Owned by the controller that drives it; there is no shared timer state.
/// `tick()` returns [`CountdownTick::Expired`] exactly once per armed
/// countdown, after which the countdown stays spent until `reset()`.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_secs: u64,
    running: bool,
    expired: bool,
}

impl Countdown {
    /// Create a stopped countdown armed with `limit`.
    pub fn new(limit: Duration) -> Self {
        Self {
            remaining_secs: limit.as_secs(),
            running: false,
            expired: false,
        }
    }

    /// Start (or resume) the countdown. A spent countdown stays spent.
    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Pause the countdown without rearming it.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Rearm the countdown with a fresh limit. Clears the expired latch.
    pub fn reset(&mut self, limit: Duration) {
        self.remaining_secs = limit.as_secs();
        self.running = false;
        self.expired = false;
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> CountdownTick {
        if !self.running || self.expired {
            return CountdownTick::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            self.expired = true;
            self.running = false;
            CountdownTick::Expired
        } else {
            CountdownTick::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Seconds remaining.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Whether the countdown is currently ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the countdown has fired its expiry.
    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// True while remaining time is in `(0, OVERTIME_WARNING_SECS]`.
    pub fn in_final_stretch(&self) -> bool {
        self.remaining_secs > 0 && self.remaining_secs <= OVERTIME_WARNING_SECS
    }
}
