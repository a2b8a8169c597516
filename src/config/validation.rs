//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{MotorConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Speeds are strictly positive
/// - Acceleration percentage is within 0-100
///
/// Microsteps are already checked while deserializing.
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, motor) in config.motors.iter() {
        validate_motor(motor)?;
    }

    Ok(())
}

/// Validate a single motor configuration.
pub fn validate_motor(config: &MotorConfig) -> Result<()> {
    if !config.initial_speed.is_valid() {
        return Err(Error::Config(ConfigError::InvalidSpeed(
            config.initial_speed.value(),
        )));
    }

    if let Some(target) = config.target_speed {
        if !target.is_valid() {
            return Err(Error::Config(ConfigError::InvalidSpeed(target.value())));
        }
    }

    if config.accel_percent > 100 {
        return Err(Error::Config(ConfigError::InvalidAccelPercent(
            config.accel_percent,
        )));
    }

    Ok(())
}
