use std::time::Instant;

/// Source of monotonic integer ticks.
///
/// The frame clock only ever sees ticks, so tests can drive it with
/// hand-picked readings.
pub trait TickSource {
    /// Number of ticks in one second.
    fn ticks_per_second(&self) -> u64;

    /// Current reading. Never decreases.
    fn now_ticks(&self) -> u64;
}

/// Microsecond ticks measured from the moment the source was created.
#[derive(Debug, Copy, Clone)]
pub struct MonotonicTicks {
    start: Instant,
}

impl MonotonicTicks {
    pub const TICKS_PER_SECOND: u64 = 1_000_000;

    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since creation.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for MonotonicTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicTicks {
    fn ticks_per_second(&self) -> u64 {
        Self::TICKS_PER_SECOND
    }

    fn now_ticks(&self) -> u64 {
        // Saturates after ~584k years.
        u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

/// Frame timing snapshot handed to the application each frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the loop started. Drives the camera.
    pub elapsed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_ticks_never_decrease() {
        let ticks = MonotonicTicks::new();
        let a = ticks.now_ticks();
        let b = ticks.now_ticks();
        assert!(b >= a);
        assert_eq!(ticks.ticks_per_second(), 1_000_000);
    }

    #[test]
    fn elapsed_is_non_negative() {
        let ticks = MonotonicTicks::default();
        assert!(ticks.elapsed_secs() >= 0.0);
    }
}
