//! Motor configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Microsteps, Rpm};

/// Complete motor configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MotorConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Microstep setting (1, 2, 4, 8, 16 or 32).
    #[serde(default)]
    pub microsteps: Microsteps,

    /// Start and end speed of a ramped move.
    #[serde(default = "default_speed", rename = "initial_speed_rpm")]
    pub initial_speed: Rpm,

    /// Cruise speed. Defaults to the initial speed.
    #[serde(default, rename = "target_speed_rpm")]
    pub target_speed: Option<Rpm>,

    /// Share of each move spent ramping, split evenly between
    /// acceleration and deceleration (0-100).
    #[serde(default)]
    pub accel_percent: u8,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Driver enable input is active-low (A4988, DRV8825, TMC2209 step/dir).
    #[serde(default = "default_enable_active_low")]
    pub enable_active_low: bool,
}

fn default_speed() -> Rpm {
    Rpm(200)
}

fn default_enable_active_low() -> bool {
    true
}

impl MotorConfig {
    /// Create a configuration with default speeds and no ramp.
    pub fn new(name: &str) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            microsteps: Microsteps::default(),
            initial_speed: default_speed(),
            target_speed: None,
            accel_percent: 0,
            invert_direction: false,
            enable_active_low: default_enable_active_low(),
        }
    }

    /// Cruise speed, falling back to the initial speed.
    pub fn effective_target_speed(&self) -> Rpm {
        self.target_speed.unwrap_or(self.initial_speed)
    }

    /// Check if this motor ramps between two different speeds.
    pub fn is_ramped(&self) -> bool {
        self.accel_percent > 0 && self.effective_target_speed() != self.initial_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotorConfig::new("test");

        assert_eq!(config.name.as_str(), "test");
        assert_eq!(config.microsteps, Microsteps::FULL);
        assert_eq!(config.initial_speed, Rpm(200));
        assert_eq!(config.effective_target_speed(), Rpm(200));
        assert!(config.enable_active_low);
        assert!(!config.is_ramped());
    }

    #[test]
    fn test_ramped() {
        let mut config = MotorConfig::new("test");
        config.target_speed = Some(Rpm(300));
        assert!(!config.is_ramped());

        config.accel_percent = 50;
        assert!(config.is_ramped());
    }
}
