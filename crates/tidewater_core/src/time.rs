//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the application runner and handed
//! to everything that needs timing data. All fields are read-only from the
//! consumer's perspective; the runner owns the `TimeClock` that produces
//! snapshots.

/// A snapshot of timing information for the current frame.
///
/// `Copy`, so callbacks can stash a local copy freely.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1 so a long
    /// stall (debugger, window drag) cannot explode the simulation step.
    pub delta: f32,

    /// Total seconds elapsed since the application started.
    pub elapsed: f64,

    /// Number of frames rendered so far (0 on the first frame).
    pub frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }
}

// ─── Clock (lives in the runner) ───────────────────────────────────────────

/// Stateful timer that accumulates time and produces [`Time`] snapshots.
pub struct TimeClock {
    start: std::time::Instant,
    last_tick: std::time::Instant,
    frame_count: u64,
}

impl TimeClock {
    /// Creates a new clock, starting the epoch now.
    pub fn new() -> Self {
        let now = std::time::Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Returns the current [`Time`] snapshot without advancing the clock.
    ///
    /// For callbacks off the hot frame path (setup, resize) that want valid
    /// timing data but must not advance the frame counter.
    pub fn peek(&self) -> Time {
        let now = std::time::Instant::now();
        Time {
            delta: (now - self.last_tick).as_secs_f32().min(0.1),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        }
    }

    /// Advances by one frame and returns the snapshot for it.
    pub fn tick(&mut self) -> Time {
        let now = std::time::Instant::now();
        let snapshot = Time {
            delta: (now - self.last_tick).as_secs_f32().min(0.1),
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
        };

        self.last_tick = now;
        self.frame_count += 1;

        snapshot
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_count() {
        let mut clock = TimeClock::new();
        assert_eq!(clock.tick().frame_count, 0);
        assert_eq!(clock.tick().frame_count, 1);
        assert_eq!(clock.peek().frame_count, 2);
    }

    #[test]
    fn delta_is_clamped() {
        let mut clock = TimeClock::new();
        clock.last_tick = std::time::Instant::now() - std::time::Duration::from_secs(5);
        assert!(clock.tick().delta <= 0.1);
    }
}
