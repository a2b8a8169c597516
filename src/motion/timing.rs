//! Step timing and step-count conversion.
//!
//! A step pulse is two equal half-phases (high, low). For a 1.8° motor the
//! full step period at `rpm` and `microsteps` is
//! `ceil(1.8 / (6 * rpm * microsteps) * 1e6)` microseconds, which reduces to
//! `ceil(300_000 / (rpm * microsteps))`. The integer form is used so float
//! rounding can never push the ceiling up by one.

use libm::{fabs, round};

use crate::config::units::{Degrees, Microsteps, Revolutions, Rpm};
use crate::error::{MotionError, Result};

/// Full step period numerator: 1.8° / (6 × 360°/min) in µs·rpm.
const PERIOD_US_RPM: u64 = 300_000;

/// Duration of one half-phase of a step pulse.
///
/// Stored in nanoseconds so that odd microsecond periods split exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepInterval {
    half_ns: u32,
}

impl StepInterval {
    /// Compute the half interval for a speed and microstep setting.
    ///
    /// A zero speed yields the slowest representable interval.
    pub fn from_rpm(rpm: Rpm, microsteps: Microsteps) -> Self {
        let divisor = rpm.value() as u64 * microsteps.value() as u64;
        if divisor == 0 {
            return Self { half_ns: u32::MAX };
        }

        let period_us = (PERIOD_US_RPM + divisor - 1) / divisor;
        let half_ns = (period_us * 500).min(u32::MAX as u64) as u32;

        Self { half_ns }
    }

    /// Create from a raw half interval in nanoseconds.
    #[inline]
    pub const fn from_half_ns(half_ns: u32) -> Self {
        Self { half_ns }
    }

    /// Half interval in nanoseconds.
    #[inline]
    pub const fn half_ns(self) -> u32 {
        self.half_ns
    }

    /// Half interval in microseconds.
    #[inline]
    pub fn half_us(self) -> f32 {
        self.half_ns as f32 / 1000.0
    }

    /// Full step period (both half-phases) in nanoseconds.
    #[inline]
    pub fn period_ns(self) -> u64 {
        self.half_ns as u64 * 2
    }
}

/// Half-step interval in microseconds for a speed and microstep setting.
pub fn half_step_interval_us(rpm: Rpm, microsteps: Microsteps) -> f32 {
    StepInterval::from_rpm(rpm, microsteps).half_us()
}

/// Signed step count for an angular displacement in degrees.
///
/// # Errors
///
/// Returns `MotionError::StepCountOverflow` if the magnitude exceeds `u32::MAX` steps.
pub fn steps_from_degrees(degrees: Degrees, microsteps: Microsteps) -> Result<i64> {
    let pulses = degrees.value() as f64 / 360.0 * microsteps.steps_per_revolution() as f64;
    rounded_steps(pulses)
}

/// Signed step count for a number of revolutions.
///
/// # Errors
///
/// Returns `MotionError::StepCountOverflow` if the magnitude exceeds `u32::MAX` steps.
pub fn steps_from_revolutions(revolutions: Revolutions, microsteps: Microsteps) -> Result<i64> {
    let pulses = revolutions.value() as f64 * microsteps.steps_per_revolution() as f64;
    rounded_steps(pulses)
}

fn rounded_steps(pulses: f64) -> Result<i64> {
    if !pulses.is_finite() {
        return Ok(0);
    }

    let steps = round(pulses);
    if fabs(steps) > u32::MAX as f64 {
        return Err(MotionError::StepCountOverflow.into());
    }

    Ok(steps as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_interval_full_step_200_rpm() {
        // 300_000 / 200 = 1500 us period
        let interval = StepInterval::from_rpm(Rpm(200), Microsteps::FULL);
        assert_eq!(interval.half_ns(), 750_000);
        assert_eq!(interval.period_ns(), 1_500_000);
        assert!((half_step_interval_us(Rpm(200), Microsteps::FULL) - 750.0).abs() < 0.001);
    }

    #[test]
    fn test_interval_rounds_up() {
        // 300_000 / 700 = 428.57 -> 429 us, half = 214.5 us
        let interval = StepInterval::from_rpm(Rpm(700), Microsteps::FULL);
        assert_eq!(interval.half_ns(), 214_500);
    }

    #[test]
    fn test_interval_scales_with_microsteps() {
        let full = StepInterval::from_rpm(Rpm(300), Microsteps::FULL);
        let eighth = StepInterval::from_rpm(Rpm(300), Microsteps::EIGHTH);
        assert_eq!(full.half_ns(), 500_000);
        assert_eq!(eighth.half_ns(), 62_500);
    }

    #[test]
    fn test_zero_rpm_is_slowest() {
        let interval = StepInterval::from_rpm(Rpm(0), Microsteps::FULL);
        assert_eq!(interval.half_ns(), u32::MAX);
    }

    #[test]
    fn test_degrees_to_steps() {
        assert_eq!(steps_from_degrees(Degrees(90.0), Microsteps::FULL).unwrap(), 50);
        assert_eq!(steps_from_degrees(Degrees(-90.0), Microsteps::HALF).unwrap(), -100);
        // 1° at full step is 0.556 steps
        assert_eq!(steps_from_degrees(Degrees(1.0), Microsteps::FULL).unwrap(), 1);
        assert_eq!(steps_from_degrees(Degrees(0.5), Microsteps::FULL).unwrap(), 0);
    }

    #[test]
    fn test_revolutions_to_steps() {
        assert_eq!(steps_from_revolutions(Revolutions(1.0), Microsteps::FULL).unwrap(), 200);
        assert_eq!(steps_from_revolutions(Revolutions(1.0), Microsteps::EIGHTH).unwrap(), 1600);
        assert_eq!(steps_from_revolutions(Revolutions(0.5), Microsteps::THIRTY_SECOND).unwrap(), 3200);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(steps_from_degrees(Degrees(f32::NAN), Microsteps::FULL).unwrap(), 0);
        assert_eq!(steps_from_revolutions(Revolutions(f32::INFINITY), Microsteps::FULL).unwrap(), 0);
    }

    #[test]
    fn test_overflow() {
        let result = steps_from_revolutions(Revolutions(1.0e9), Microsteps::THIRTY_SECOND);
        assert!(matches!(
            result,
            Err(Error::Motion(MotionError::StepCountOverflow))
        ));
    }
}
