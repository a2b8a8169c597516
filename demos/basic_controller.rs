//! Basic controller example.
//!
//! Runs a flat move, a reversed move and a ramped move against logging
//! stand-ins for the driver pins, then prints the schedule of the ramped move.

use std::time::{Duration, Instant};

use stepper_ramp::{Direction, MotionControllerBuilder, Revolutions};

/// Delay provider backed by the host clock.
struct HostDelay;

impl embedded_hal::delay::DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

/// Output pin that only remembers its level.
struct MockPin {
    label: &'static str,
    state: bool,
    rising_edges: u32,
}

impl MockPin {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            state: false,
            rising_edges: 0,
        }
    }
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.state {
            self.rising_edges += 1;
        }
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

fn main() {
    println!("=== Basic Controller Example ===\n");

    let mut motor = MotionControllerBuilder::new()
        .name("demo_motor")
        .step_pin(MockPin::new("step"))
        .dir_pin(MockPin::new("dir"))
        .enable_pin(MockPin::new("enable"))
        .delay(HostDelay)
        .build()
        .expect("Failed to build controller");

    println!("Controller created: {}", motor.name());
    println!(
        "Initial speed {} rpm, target speed {} rpm, {} microsteps",
        motor.initial_speed().value(),
        motor.target_speed().value(),
        motor.microsteps().value()
    );

    let started = Instant::now();
    motor
        .rotate_revolutions(Revolutions(2.0), Direction::Forward, false)
        .expect("Forward move failed");
    println!(
        "2 rev forward in {:?}, position {} steps, state {}",
        started.elapsed(),
        motor.position_steps().value(),
        motor.state().name()
    );

    motor
        .rotate_revolutions(Revolutions(1.0), Direction::Reverse, true)
        .expect("Reverse move failed");
    println!(
        "1 rev reverse (holding), position {} steps, enabled = {}",
        motor.position_steps().value(),
        motor.is_enabled()
    );

    motor.set_target_speed(300);
    motor.set_accel_percent(50);

    let schedule = motor.settings().schedule(200);
    println!("\nRamped revolution schedule:");
    println!("  Ramp steps: {}", schedule.ramp_steps());
    println!("  Accel boundary: {}", schedule.accel_boundary);
    println!("  Decel boundary: {}", schedule.decel_boundary);
    println!("  Increment: {:.1} ns per step", schedule.increment_ns);
    println!("  Duration: {:.1} ms", schedule.duration_ns() as f64 / 1e6);

    let started = Instant::now();
    motor
        .rotate_revolutions(Revolutions(1.0), Direction::Forward, false)
        .expect("Ramped move failed");
    println!("Ramped revolution in {:?}", started.elapsed());

    let (step, dir, enable, _) = motor.release();
    println!("\nLines:");
    println!("  {}: {} pulses", step.label, step.rising_edges);
    if let Some(dir) = dir {
        println!("  {}: {}", dir.label, if dir.state { "high" } else { "low" });
    }
    if let Some(enable) = enable {
        println!("  {}: {}", enable.label, if enable.state { "high" } else { "low" });
    }

    println!("\n=== Example Complete ===");
}
