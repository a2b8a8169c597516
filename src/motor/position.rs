//! Open-loop position tracking.
//!
//! Counts emitted step pulses; nothing here observes the shaft. The count is
//! kept in units of the current microstep setting.

use crate::config::units::{Degrees, Microsteps, Steps};
use crate::motion::Direction;

/// Motor position tracker.
///
/// Maintains a signed pulse count from the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    steps: Steps,
}

impl Position {
    /// Create a tracker at the origin.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Current position in degrees at the given microstep setting.
    #[inline]
    pub fn degrees(&self, microsteps: Microsteps) -> Degrees {
        self.steps.to_degrees(microsteps)
    }

    /// Record one pulse in `direction`.
    #[inline]
    pub fn step(&mut self, direction: Direction) {
        self.steps = Steps(self.steps.0.saturating_add(direction.sign()));
    }

    /// Convert the count from one microstep setting to another.
    ///
    /// Going to a coarser setting truncates toward zero, dropping any
    /// partial full-resolution step.
    pub fn rescale(&mut self, from: Microsteps, to: Microsteps) {
        let scaled = self.steps.0 as i128 * to.value() as i128 / from.value() as i128;
        self.steps = Steps(scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64);
    }

    /// Set current position as the new origin.
    #[inline]
    pub fn set_origin(&mut self) {
        self.steps = Steps::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracking() {
        let mut pos = Position::new();

        for _ in 0..50 {
            pos.step(Direction::Forward);
        }
        assert_eq!(pos.steps().value(), 50);
        assert!((pos.degrees(Microsteps::FULL).value() - 90.0).abs() < 0.01);

        for _ in 0..100 {
            pos.step(Direction::Reverse);
        }
        assert_eq!(pos.steps().value(), -50);

        pos.set_origin();
        assert_eq!(pos.steps(), Steps(0));
    }

    #[test]
    fn test_rescale_keeps_angle() {
        let mut pos = Position::new();
        for _ in 0..200 {
            pos.step(Direction::Forward);
        }

        pos.rescale(Microsteps::FULL, Microsteps::EIGHTH);
        assert_eq!(pos.steps(), Steps(1600));
        assert!((pos.degrees(Microsteps::EIGHTH).value() - 360.0).abs() < 0.01);

        pos.rescale(Microsteps::EIGHTH, Microsteps::HALF);
        assert_eq!(pos.steps(), Steps(400));
    }

    #[test]
    fn test_rescale_truncates_toward_zero() {
        let mut pos = Position::new();
        for _ in 0..3 {
            pos.step(Direction::Reverse);
        }

        pos.rescale(Microsteps::QUARTER, Microsteps::FULL);
        assert_eq!(pos.steps(), Steps(0));
    }
}
