//! Motor module for stepper-ramp.
//!
//! Provides the blocking motion controller, its settings and position tracking.

mod builder;
mod driver;
mod pins;
mod position;
mod settings;
mod state;

pub use builder::MotionControllerBuilder;
pub use driver::{MotionController, MotionRequest};
pub use pins::NoPin;
pub use position::Position;
pub use settings::MotorSettings;
pub use state::MoveState;
