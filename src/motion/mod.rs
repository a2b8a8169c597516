//! Motion module for stepper-ramp.
//!
//! Provides step timing, ramp schedule calculation and step sequencing.

mod executor;
mod profile;
pub mod timing;

pub use executor::MotionExecutor;
pub use profile::{Direction, MotionPhase, RampSchedule};
pub use timing::{half_step_interval_us, steps_from_degrees, steps_from_revolutions, StepInterval};
