//! Builder pattern for MotionController.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Microsteps, Rpm};
use crate::config::{validate_motor, MotorConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::MotionController;
use super::pins::NoPin;
use super::settings::MotorSettings;

/// Builder for creating MotionController instances.
///
/// Direction and enable lines are optional; leaving them out keeps the
/// corresponding type parameter at [`NoPin`].
pub struct MotionControllerBuilder<STEP, DELAY, DIR = NoPin, EN = NoPin> {
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    enable_pin: Option<EN>,
    delay: Option<DELAY>,
    config: MotorConfig,
}

impl<STEP, DELAY> Default for MotionControllerBuilder<STEP, DELAY>
where
    STEP: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DELAY> MotionControllerBuilder<STEP, DELAY>
where
    STEP: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder with default settings and no optional lines.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            enable_pin: None,
            delay: None,
            config: MotorConfig::new("motor"),
        }
    }
}

impl<STEP, DELAY, DIR, EN> MotionControllerBuilder<STEP, DELAY, DIR, EN>
where
    STEP: OutputPin,
    DELAY: DelayNs,
    DIR: OutputPin,
    EN: OutputPin,
{
    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin<P: OutputPin>(self, pin: P) -> MotionControllerBuilder<STEP, DELAY, P, EN> {
        MotionControllerBuilder {
            step_pin: self.step_pin,
            dir_pin: Some(pin),
            enable_pin: self.enable_pin,
            delay: self.delay,
            config: self.config,
        }
    }

    /// Set the ENABLE pin.
    pub fn enable_pin<P: OutputPin>(self, pin: P) -> MotionControllerBuilder<STEP, DELAY, DIR, P> {
        MotionControllerBuilder {
            step_pin: self.step_pin,
            dir_pin: self.dir_pin,
            enable_pin: Some(pin),
            delay: self.delay,
            config: self.config,
        }
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the motor name.
    pub fn name(mut self, name: &str) -> Self {
        if let Ok(name) = heapless::String::try_from(name) {
            self.config.name = name;
        }
        self
    }

    /// Set microstep configuration.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.config.microsteps = microsteps;
        self
    }

    /// Set the start/end speed of ramped moves.
    pub fn initial_speed(mut self, rpm: Rpm) -> Self {
        self.config.initial_speed = rpm;
        self
    }

    /// Set the cruise speed.
    pub fn target_speed(mut self, rpm: Rpm) -> Self {
        self.config.target_speed = Some(rpm);
        self
    }

    /// Set the share of each move spent ramping (0-100).
    pub fn accel_percent(mut self, percent: u8) -> Self {
        self.config.accel_percent = percent;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.config.invert_direction = invert;
        self
    }

    /// Set whether the driver enables on a low level (default `true`).
    pub fn enable_active_low(mut self, active_low: bool) -> Self {
        self.config.enable_active_low = active_low;
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Configure from a named motor in a SystemConfig.
    ///
    /// # Errors
    ///
    /// Returns an error if the motor name is not found.
    pub fn from_config(self, config: &SystemConfig, motor_name: &str) -> Result<Self> {
        let motor_config = config
            .motor(motor_name)
            .ok_or_else(|| Error::Config(ConfigError::MotorNotFound(
                heapless::String::try_from(motor_name).unwrap_or_default(),
            )))?;

        Ok(self.from_motor_config(motor_config))
    }

    /// Build the MotionController.
    ///
    /// # Errors
    ///
    /// Returns an error if the STEP pin or delay is missing, or if the
    /// speeds or ramp share are out of range.
    pub fn build(self) -> Result<MotionController<STEP, DELAY, DIR, EN>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;

        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;

        validate_motor(&self.config)?;

        Ok(MotionController::new(
            step_pin,
            self.dir_pin,
            self.enable_pin,
            delay,
            MotorSettings::from_config(&self.config),
            self.config.name.clone(),
            self.config.invert_direction,
            self.config.enable_active_low,
        ))
    }
}
