// Per-pick countdown clock.
//
// A synchronous state machine ticked once per real second by the event loop.
// The clock raises its expiration signal exactly once and never restarts
// itself; the engine must call `start()` again after it has processed the
// resulting auto-pick. That split is what keeps a timer expiration and a
// last-instant manual pick from producing two picks for one pick number.

use serde::{Deserialize, Serialize};

/// Where the clock is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPhase {
    /// No pick on the clock yet.
    Idle,
    /// Counting down (unless paused).
    Running,
    /// Reached zero; expiration signal already raised.
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clock {
    phase: ClockPhase,
    /// Whole seconds left on the current pick.
    remaining: u32,
    /// Per-pick duration `start()` resets to.
    duration: u32,
    paused: bool,
}

impl Clock {
    pub fn new(duration: u32) -> Self {
        Clock {
            phase: ClockPhase::Idle,
            remaining: duration,
            duration,
            paused: false,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Begin (or restart) the countdown for a new pick at the full per-pick
    /// duration. Also clears an Expired phase once the engine has handled
    /// the auto-pick.
    pub fn start(&mut self) {
        self.phase = ClockPhase::Running;
        self.remaining = self.duration;
    }

    /// Suspend decrementing. Remaining time is kept.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue decrementing from where `pause()` left off.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advance the clock by one second of real time.
    ///
    /// Returns `true` exactly once: on the tick that moves the clock from
    /// Running to Expired. Every later tick is a no-op until `start()` is
    /// called again.
    pub fn tick(&mut self) -> bool {
        if self.phase != ClockPhase::Running || self.paused {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = ClockPhase::Expired;
            return true;
        }
        false
    }
}
