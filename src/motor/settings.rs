//! Runtime motor settings with validated setters.
//!
//! Invalid values never reach the settings: each setter leaves the previous
//! value in place and reports the rejection through its return value.
//! Speed changes recompute the cached step interval immediately.

use crate::config::units::{Microsteps, Rpm};
use crate::config::MotorConfig;
use crate::motion::{RampSchedule, StepInterval};

/// Mutable motor settings owned by a controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorSettings {
    microsteps: Microsteps,
    initial_speed: Rpm,
    target_speed: Rpm,
    accel_percent: u8,
    initial_interval: StepInterval,
    target_interval: StepInterval,
}

impl Default for MotorSettings {
    /// Full step, 200 rpm start and cruise, no ramp.
    fn default() -> Self {
        Self::new(Microsteps::FULL, Rpm(200), Rpm(200), 0)
    }
}

impl MotorSettings {
    fn new(microsteps: Microsteps, initial_speed: Rpm, target_speed: Rpm, accel_percent: u8) -> Self {
        Self {
            microsteps,
            initial_speed,
            target_speed,
            accel_percent,
            initial_interval: StepInterval::from_rpm(initial_speed, microsteps),
            target_interval: StepInterval::from_rpm(target_speed, microsteps),
        }
    }

    /// Seed settings from a motor configuration.
    ///
    /// Fields that fail validation keep their defaults.
    pub fn from_config(config: &MotorConfig) -> Self {
        let mut settings = Self::default();
        settings.set_microsteps(config.microsteps.value());
        settings.set_initial_speed(config.initial_speed.value());
        settings.set_target_speed(config.effective_target_speed().value());
        settings.set_accel_percent(config.accel_percent);
        settings
    }

    /// Set the microstep divisor.
    ///
    /// Accepts 1, 2, 4, 8, 16 or 32 and recomputes both step intervals.
    /// Returns `false` and keeps the current setting for any other value.
    pub fn set_microsteps(&mut self, value: u16) -> bool {
        let Ok(microsteps) = Microsteps::new(value) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("ignoring invalid microsteps {}", value);
            return false;
        };

        self.microsteps = microsteps;
        self.initial_interval = StepInterval::from_rpm(self.initial_speed, microsteps);
        self.target_interval = StepInterval::from_rpm(self.target_speed, microsteps);
        true
    }

    /// Set the start/end speed of ramped moves and recompute its interval.
    ///
    /// Returns `false` and keeps the current speed if `rpm` is zero.
    pub fn set_initial_speed(&mut self, rpm: u32) -> bool {
        let rpm = Rpm(rpm);
        if !rpm.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ignoring invalid initial speed {} rpm", rpm.value());
            return false;
        }

        self.initial_speed = rpm;
        self.initial_interval = StepInterval::from_rpm(rpm, self.microsteps);
        true
    }

    /// Set the cruise speed and recompute its interval.
    ///
    /// Returns `false` and keeps the current speed if `rpm` is zero.
    pub fn set_target_speed(&mut self, rpm: u32) -> bool {
        let rpm = Rpm(rpm);
        if !rpm.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ignoring invalid target speed {} rpm", rpm.value());
            return false;
        }

        self.target_speed = rpm;
        self.target_interval = StepInterval::from_rpm(rpm, self.microsteps);
        true
    }

    /// Set the share of each move spent ramping (0-100).
    ///
    /// Half of it accelerates at the start, half decelerates at the end.
    /// Returns `false` and keeps the current value above 100.
    pub fn set_accel_percent(&mut self, percent: u8) -> bool {
        if percent > 100 {
            #[cfg(feature = "defmt")]
            defmt::warn!("ignoring invalid acceleration percent {}", percent);
            return false;
        }

        self.accel_percent = percent;
        true
    }

    /// Current microstep divisor.
    #[inline]
    pub fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Start/end speed of ramped moves.
    #[inline]
    pub fn initial_speed(&self) -> Rpm {
        self.initial_speed
    }

    /// Cruise speed.
    #[inline]
    pub fn target_speed(&self) -> Rpm {
        self.target_speed
    }

    /// Ramp share as a percentage.
    #[inline]
    pub fn accel_percent(&self) -> u8 {
        self.accel_percent
    }

    /// Ramp share as a fraction in `[0.0, 1.0]`.
    #[inline]
    pub fn accel_fraction(&self) -> f32 {
        self.accel_percent as f32 / 100.0
    }

    /// Half interval at the initial speed.
    #[inline]
    pub fn initial_interval(&self) -> StepInterval {
        self.initial_interval
    }

    /// Half interval at the target speed.
    #[inline]
    pub fn target_interval(&self) -> StepInterval {
        self.target_interval
    }

    /// Build the schedule for a move of `total_steps`.
    pub fn schedule(&self, total_steps: u32) -> RampSchedule {
        RampSchedule::trapezoidal(
            total_steps,
            self.accel_percent,
            self.initial_interval,
            self.target_interval,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MotorSettings::default();

        assert_eq!(settings.microsteps(), Microsteps::FULL);
        assert_eq!(settings.initial_speed(), Rpm(200));
        assert_eq!(settings.target_speed(), Rpm(200));
        assert_eq!(settings.accel_fraction(), 0.0);
        assert_eq!(settings.target_interval().half_ns(), 750_000);
    }

    #[test]
    fn test_invalid_microsteps_is_noop() {
        let mut settings = MotorSettings::default();
        assert!(settings.set_microsteps(8));
        let before = settings.clone();

        assert!(!settings.set_microsteps(3));
        assert!(!settings.set_microsteps(3));
        assert_eq!(settings, before);
    }

    #[test]
    fn test_microsteps_recomputes_intervals() {
        let mut settings = MotorSettings::default();
        assert!(settings.set_target_speed(300));
        assert_eq!(settings.target_interval().half_ns(), 500_000);

        assert!(settings.set_microsteps(2));
        assert_eq!(settings.target_interval().half_ns(), 250_000);
        assert_eq!(settings.initial_interval().half_ns(), 375_000);
    }

    #[test]
    fn test_speed_setters_recompute_eagerly() {
        let mut settings = MotorSettings::default();

        assert!(settings.set_initial_speed(100));
        assert_eq!(settings.initial_interval().half_ns(), 1_500_000);

        assert!(!settings.set_target_speed(0));
        assert_eq!(settings.target_speed(), Rpm(200));
        assert_eq!(settings.target_interval().half_ns(), 750_000);
    }

    #[test]
    fn test_accel_percent_range() {
        let mut settings = MotorSettings::default();

        assert!(settings.set_accel_percent(50));
        assert_eq!(settings.accel_fraction(), 0.5);

        assert!(!settings.set_accel_percent(101));
        assert_eq!(settings.accel_percent(), 50);

        assert!(settings.set_accel_percent(100));
        assert!(settings.set_accel_percent(0));
    }

    #[test]
    fn test_from_config() {
        let mut config = MotorConfig::new("test");
        config.microsteps = Microsteps::EIGHTH;
        config.initial_speed = Rpm(60);
        config.target_speed = Some(Rpm(300));
        config.accel_percent = 120;

        let settings = MotorSettings::from_config(&config);
        assert_eq!(settings.microsteps(), Microsteps::EIGHTH);
        assert_eq!(settings.initial_speed(), Rpm(60));
        assert_eq!(settings.target_speed(), Rpm(300));
        // out of range, default kept
        assert_eq!(settings.accel_percent(), 0);
    }
}
