//! Interval timer utility
//!
//! Foundation for all periodic behavior in the node. Time is injected as a
//! millisecond timestamp rather than read from a global clock; arithmetic
//! wraps consistently with the underlying u32 counter. Precision is bounded
//! by the tick rate of the enclosing scheduler call.

/// A monotonic interval/elapsed-time timer
///
/// Two independent clocks live here:
/// - the fire cycle (`has_elapsed` / `check_and_reset` / `reset`), driven by
///   `interval`,
/// - the animation clock (`elapsed` / `restart`), measuring time since the
///   epoch and unaffected by fire-cycle resets.
///
/// An interval of zero means "disabled": `check_and_reset` never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    interval: u32,
    last_fired: u32,
    epoch: u32,
}

impl Timer {
    /// Create a timer with the given interval in milliseconds
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval: interval_ms,
            last_fired: 0,
            epoch: 0,
        }
    }

    /// The configured interval in milliseconds
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Replace the interval; the current fire cycle keeps running
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval = interval_ms;
    }

    /// True once more than one interval has passed since the last reset
    pub fn has_elapsed(&self, now: u32) -> bool {
        now.wrapping_sub(self.last_fired) > self.interval
    }

    /// Fire-and-rearm: returns true at most once per elapsed interval
    ///
    /// A zero interval never fires.
    pub fn check_and_reset(&mut self, now: u32) -> bool {
        if self.interval == 0 {
            return false;
        }
        if self.has_elapsed(now) {
            self.reset(now);
            return true;
        }
        false
    }

    /// Rearm the fire cycle without touching the animation clock
    pub fn reset(&mut self, now: u32) {
        self.last_fired = now;
    }

    /// Milliseconds since the epoch (the animation clock)
    pub fn elapsed(&self, now: u32) -> u32 {
        now.wrapping_sub(self.epoch)
    }

    /// Restart the animation clock at `now`
    pub fn restart(&mut self, now: u32) {
        self.epoch = now;
    }
}
