//! Stepper motion controller.
//!
//! Generic over embedded-hal 1.0 pin types. Direction and enable lines are
//! optional; an absent line is simply never written.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Degrees, Microsteps, Revolutions, Rpm, Steps};
use crate::error::{MotionError, MotorError, Result};
use crate::motion::{
    steps_from_degrees, steps_from_revolutions, Direction, MotionExecutor, StepInterval,
};

use super::pins::NoPin;
use super::position::Position;
use super::settings::MotorSettings;
use super::state::MoveState;

/// A single move: step count, direction and what to do with the driver afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRequest {
    /// Number of step pulses.
    pub steps: u32,
    /// Rotation direction.
    pub direction: Direction,
    /// Keep the driver enabled after the move to retain holding torque.
    pub hold: bool,
}

impl MotionRequest {
    /// Create a request.
    pub fn new(steps: u32, direction: Direction, hold: bool) -> Self {
        Self {
            steps,
            direction,
            hold,
        }
    }

    /// Create a request from a signed step count.
    ///
    /// A negative count runs `|steps|` pulses opposite to `direction`.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::StepCountOverflow` if `|steps|` exceeds `u32::MAX`.
    pub fn from_signed(steps: i64, direction: Direction, hold: bool) -> Result<Self> {
        let count =
            u32::try_from(steps.unsigned_abs()).map_err(|_| MotionError::StepCountOverflow)?;
        let direction = if steps < 0 {
            direction.opposite()
        } else {
            direction
        };

        Ok(Self::new(count, direction, hold))
    }
}

/// Blocking stepper motion controller.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
/// - `DIR`: optional DIR pin type, [`NoPin`] when not wired
/// - `EN`: optional ENABLE pin type, [`NoPin`] when not wired
pub struct MotionController<STEP, DELAY, DIR = NoPin, EN = NoPin>
where
    STEP: OutputPin,
    DELAY: DelayNs,
    DIR: OutputPin,
    EN: OutputPin,
{
    /// STEP pin (one pulse per step).
    step_pin: STEP,

    /// DIR pin (high = forward unless inverted).
    dir_pin: Option<DIR>,

    /// ENABLE pin.
    enable_pin: Option<EN>,

    /// Delay provider for step timing.
    delay: DELAY,

    /// Speeds, microstepping and ramp share.
    settings: MotorSettings,

    /// Open-loop pulse count.
    position: Position,

    /// Last state reached.
    state: MoveState,

    /// Whether the enable line is currently asserted.
    enabled: bool,

    /// Motor name for logging/debugging.
    name: heapless::String<32>,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Whether the driver enables on a low level.
    enable_active_low: bool,
}

impl<STEP, DELAY, DIR, EN> MotionController<STEP, DELAY, DIR, EN>
where
    STEP: OutputPin,
    DELAY: DelayNs,
    DIR: OutputPin,
    EN: OutputPin,
{
    /// Create a new controller.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: Option<DIR>,
        enable_pin: Option<EN>,
        delay: DELAY,
        settings: MotorSettings,
        name: heapless::String<32>,
        invert_direction: bool,
        enable_active_low: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            delay,
            settings,
            position: Position::new(),
            state: MoveState::Idle,
            enabled: false,
            name,
            invert_direction,
            enable_active_low,
        }
    }

    /// Get the motor name.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Get the current settings.
    #[inline]
    pub fn settings(&self) -> &MotorSettings {
        &self.settings
    }

    /// Get the last move state reached.
    #[inline]
    pub fn state(&self) -> MoveState {
        self.state
    }

    /// Check if the enable line is asserted.
    ///
    /// Always `false` when no enable line is wired.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position.steps()
    }

    /// Get current position in degrees.
    #[inline]
    pub fn position_degrees(&self) -> Degrees {
        self.position.degrees(self.settings.microsteps())
    }

    /// Set the current position as the origin (zero).
    pub fn set_origin(&mut self) {
        self.position.set_origin();
    }

    /// Set the microstep divisor. See [`MotorSettings::set_microsteps`].
    ///
    /// An accepted change also rescales the tracked position so it keeps
    /// pointing at the same angle.
    pub fn set_microsteps(&mut self, value: u16) -> bool {
        let previous = self.settings.microsteps();
        if !self.settings.set_microsteps(value) {
            return false;
        }

        self.position.rescale(previous, self.settings.microsteps());
        true
    }

    /// Set the start/end speed. See [`MotorSettings::set_initial_speed`].
    pub fn set_initial_speed(&mut self, rpm: u32) -> bool {
        self.settings.set_initial_speed(rpm)
    }

    /// Set the cruise speed. See [`MotorSettings::set_target_speed`].
    pub fn set_target_speed(&mut self, rpm: u32) -> bool {
        self.settings.set_target_speed(rpm)
    }

    /// Set the ramp share. See [`MotorSettings::set_accel_percent`].
    pub fn set_accel_percent(&mut self, percent: u8) -> bool {
        self.settings.set_accel_percent(percent)
    }

    /// Current microstep divisor.
    #[inline]
    pub fn microsteps(&self) -> Microsteps {
        self.settings.microsteps()
    }

    /// Start/end speed of ramped moves.
    #[inline]
    pub fn initial_speed(&self) -> Rpm {
        self.settings.initial_speed()
    }

    /// Cruise speed.
    #[inline]
    pub fn target_speed(&self) -> Rpm {
        self.settings.target_speed()
    }

    /// Ramp share as a fraction in `[0.0, 1.0]`.
    #[inline]
    pub fn accel_fraction(&self) -> f32 {
        self.settings.accel_fraction()
    }

    /// Assert the enable line, engaging holding torque.
    pub fn enable(&mut self) -> Result<()> {
        self.set_enabled(true)
    }

    /// Deassert the enable line, letting the shaft spin freely.
    pub fn disable(&mut self) -> Result<()> {
        self.set_enabled(false)
    }

    /// Rotate by an angle in degrees.
    ///
    /// The step count is `round(degrees / 360 * 200 * microsteps)`. A negative
    /// angle rotates opposite to `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the step count overflows or a pin write fails.
    pub fn rotate_degrees(&mut self, degrees: Degrees, direction: Direction, hold: bool) -> Result<()> {
        let steps = steps_from_degrees(degrees, self.settings.microsteps())?;
        self.execute(MotionRequest::from_signed(steps, direction, hold)?)
    }

    /// Rotate by a number of revolutions.
    ///
    /// The step count is `round(revolutions * 200 * microsteps)`. A negative
    /// count rotates opposite to `direction`.
    ///
    /// # Errors
    ///
    /// Returns an error if the step count overflows or a pin write fails.
    pub fn rotate_revolutions(
        &mut self,
        revolutions: Revolutions,
        direction: Direction,
        hold: bool,
    ) -> Result<()> {
        let steps = steps_from_revolutions(revolutions, self.settings.microsteps())?;
        self.execute(MotionRequest::from_signed(steps, direction, hold)?)
    }

    /// Rotate by a raw number of step pulses.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin write fails.
    pub fn rotate_steps(&mut self, steps: u32, direction: Direction, hold: bool) -> Result<()> {
        self.execute(MotionRequest::new(steps, direction, hold))
    }

    /// Run a move to completion (blocking).
    ///
    /// Sets the direction line, asserts the enable line, emits every pulse of
    /// the schedule built from the current settings and, unless
    /// `request.hold` is set, deasserts the enable line. A zero-step request
    /// still performs the line setup and the release.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::PinError` if a pin write fails. The move stops at
    /// the failing write and the enable line is left as it was.
    pub fn execute(&mut self, request: MotionRequest) -> Result<()> {
        let schedule = self.settings.schedule(request.steps);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{}: {} steps {}, ramp boundaries {}..{}",
            self.name.as_str(),
            request.steps,
            request.direction,
            schedule.accel_boundary,
            schedule.decel_boundary
        );

        self.state = MoveState::Idle;

        self.write_direction(request.direction)?;
        self.state = MoveState::DirectionSet;

        self.set_enabled(true)?;
        self.state = MoveState::Enabled;

        self.state = MoveState::Stepping;
        for interval in MotionExecutor::new(schedule) {
            self.pulse(interval)?;
            self.position.step(request.direction);
        }

        if !request.hold {
            self.set_enabled(false)?;
        }
        self.state = MoveState::Done;

        Ok(())
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (STEP, Option<DIR>, Option<EN>, DELAY) {
        (self.step_pin, self.dir_pin, self.enable_pin, self.delay)
    }

    /// One full step: high for one half interval, low for another.
    fn pulse(&mut self, interval: StepInterval) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_ns(interval.half_ns());
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        self.delay.delay_ns(interval.half_ns());
        Ok(())
    }

    fn write_direction(&mut self, direction: Direction) -> Result<()> {
        let Some(pin) = self.dir_pin.as_mut() else {
            return Ok(());
        };

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Reverse => self.invert_direction,
        };

        if pin_high {
            pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let Some(pin) = self.enable_pin.as_mut() else {
            return Ok(());
        };

        if enabled != self.enable_active_low {
            pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.enabled = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_signed() {
        let request = MotionRequest::from_signed(-50, Direction::Forward, false).unwrap();
        assert_eq!(request.steps, 50);
        assert_eq!(request.direction, Direction::Reverse);

        let request = MotionRequest::from_signed(50, Direction::Reverse, true).unwrap();
        assert_eq!(request.steps, 50);
        assert_eq!(request.direction, Direction::Reverse);
        assert!(request.hold);
    }

    #[test]
    fn test_request_overflow() {
        let result = MotionRequest::from_signed(i64::from(u32::MAX) + 1, Direction::Forward, false);
        assert!(result.is_err());
    }
}
