//! Time sources - elapsed seconds since mount, advanced once per tick
//!
//! Between two ticks a clock keeps reporting the same snapshot, so every
//! node updated in one frame sees identical time.

use std::time::Instant;

use crate::error::SceneError;

pub trait TimeSource {
    /// Advance to the next frame and return the new elapsed time
    fn tick(&mut self) -> f64;

    /// Elapsed seconds as of the last tick
    fn elapsed(&self) -> f64;
}

/// Wall-clock time sampled from a monotonic `Instant` once per tick
#[derive(Debug, Clone)]
pub struct WallClock {
    start: Instant,
    elapsed: f64,
}

impl WallClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            elapsed: 0.0,
        }
    }
}

impl TimeSource for WallClock {
    fn tick(&mut self) -> f64 {
        // Instant is monotonic; max() guards against a coarse timer repeating a reading
        self.elapsed = self.start.elapsed().as_secs_f64().max(self.elapsed);
        self.elapsed
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Deterministic clock advancing by a fixed step per tick
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f64,
    ticks: u64,
}

impl FixedStepClock {
    pub fn new(step: f64) -> Result<Self, SceneError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(SceneError::InvalidTimeStep(step));
        }
        Ok(Self { step, ticks: 0 })
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

impl TimeSource for FixedStepClock {
    fn tick(&mut self) -> f64 {
        self.ticks += 1;
        self.elapsed()
    }

    fn elapsed(&self) -> f64 {
        // Multiplying instead of accumulating keeps long runs free of drift
        self.ticks as f64 * self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_advances() {
        let mut clock = FixedStepClock::new(0.5).unwrap();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 1.0);
        assert_eq!(clock.elapsed(), 1.0);
    }

    #[test]
    fn test_fixed_step_rejects_bad_step() {
        assert!(FixedStepClock::new(0.0).is_err());
        assert!(FixedStepClock::new(-1.0 / 60.0).is_err());
        assert!(FixedStepClock::new(f64::NAN).is_err());
    }

    #[test]
    fn test_wall_clock_never_goes_back() {
        let mut clock = WallClock::start();
        let mut last = clock.elapsed();
        for _ in 0..100 {
            let now = clock.tick();
            assert!(now >= last);
            assert_eq!(clock.elapsed(), now);
            last = now;
        }
    }
}
