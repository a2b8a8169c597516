//! # stepper-ramp
//!
//! Blocking bipolar stepper motor control with linear trapezoidal ramps and
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR/ENABLE, `DelayNs` for timing
//! - **no_std compatible**: Core library works without standard library
//! - **Trapezoidal ramps**: A share of each move accelerates from an initial speed
//!   to a cruise speed and decelerates back
//! - **Microstepping**: 1 to 32 microsteps per full step
//! - **Hold or release**: Keep the driver enabled after a move, or let the shaft spin free
//! - **Configuration-driven**: Define motors in TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_ramp::{Direction, MotionControllerBuilder, Revolutions};
//!
//! let mut motor = MotionControllerBuilder::new()
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .enable_pin(enable_pin)
//!     .delay(delay)
//!     .build()?;
//!
//! motor.set_target_speed(300);
//! motor.set_accel_percent(50);
//! motor.rotate_revolutions(Revolutions(20.0), Direction::Forward, false)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use config::{validate_config, MotorConfig, SystemConfig};
pub use error::{Error, Result};
pub use motion::{Direction, MotionPhase, RampSchedule, StepInterval};
pub use motor::{MotionController, MotionControllerBuilder, MotionRequest, MotorSettings, MoveState, NoPin};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Microsteps, Revolutions, Rpm, Steps, UnitExt};
