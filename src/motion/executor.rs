//! Motion execution - cursor over a ramp schedule.

use super::profile::{MotionPhase, RampSchedule};
use super::timing::StepInterval;

/// Runtime state during motion execution.
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    /// The schedule being executed.
    schedule: RampSchedule,

    /// Index of the next step to pulse (0 to total_steps).
    current_step: u32,

    /// Half interval for the next step.
    current_interval: StepInterval,

    /// Phase of the next step.
    phase: MotionPhase,
}

impl MotionExecutor {
    /// Create a new executor for a schedule.
    pub fn new(schedule: RampSchedule) -> Self {
        let phase = schedule.phase_at(0);
        let current_interval = schedule.interval_at(0);

        Self {
            schedule,
            current_step: 0,
            current_interval,
            phase,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.phase == MotionPhase::Complete
    }

    /// Get the index of the next step.
    #[inline]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// Get the total number of steps.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.schedule.total_steps
    }

    /// Get steps remaining.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.schedule.total_steps.saturating_sub(self.current_step)
    }

    /// Get the current phase.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Get the half interval for the next step.
    #[inline]
    pub fn current_interval(&self) -> StepInterval {
        self.current_interval
    }

    /// Get the schedule.
    #[inline]
    pub fn schedule(&self) -> &RampSchedule {
        &self.schedule
    }

    /// Mark the current step as pulsed and load the next one.
    ///
    /// Returns `true` if another step follows, `false` if complete.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }

        self.current_step += 1;
        self.phase = self.schedule.phase_at(self.current_step);

        if self.is_complete() {
            return false;
        }

        self.current_interval = self.schedule.interval_at(self.current_step);
        true
    }

    /// Reset the executor to the beginning.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.phase = self.schedule.phase_at(0);
        self.current_interval = self.schedule.interval_at(0);
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.schedule.total_steps == 0 {
            1.0
        } else {
            self.current_step as f32 / self.schedule.total_steps as f32
        }
    }
}

impl Iterator for MotionExecutor {
    type Item = StepInterval;

    /// Yield the half interval of the next step and move past it.
    fn next(&mut self) -> Option<StepInterval> {
        if self.is_complete() {
            return None;
        }

        let interval = self.current_interval;
        self.advance();
        Some(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half(us: u32) -> StepInterval {
        StepInterval::from_half_ns(us * 1000)
    }

    #[test]
    fn test_executor_complete() {
        let schedule = RampSchedule::trapezoidal(10, 40, half(750), half(500));
        let mut executor = MotionExecutor::new(schedule);

        assert!(!executor.is_complete());
        assert_eq!(executor.current_step(), 0);

        while executor.advance() {}

        assert!(executor.is_complete());
        assert_eq!(executor.current_step(), 10);
        assert_eq!(executor.steps_remaining(), 0);
        assert_eq!(executor.progress(), 1.0);
    }

    #[test]
    fn test_zero_schedule() {
        let executor = MotionExecutor::new(RampSchedule::flat(0, half(500)));

        assert!(executor.is_complete());
        assert_eq!(executor.steps_remaining(), 0);
        assert_eq!(executor.count(), 0);
    }

    #[test]
    fn test_yields_every_interval() {
        let schedule = RampSchedule::trapezoidal(20, 50, half(750), half(500));
        let expected: heapless::Vec<StepInterval, 20> = schedule.intervals().collect();

        let yielded: heapless::Vec<StepInterval, 20> = MotionExecutor::new(schedule).collect();
        assert_eq!(yielded, expected);
    }

    #[test]
    fn test_phase_transitions() {
        let schedule = RampSchedule::trapezoidal(100, 50, half(750), half(500));
        let mut executor = MotionExecutor::new(schedule);

        let mut saw_accel = false;
        let mut saw_cruise = false;
        let mut saw_decel = false;

        while !executor.is_complete() {
            match executor.phase() {
                MotionPhase::Accelerating => saw_accel = true,
                MotionPhase::Cruising => saw_cruise = true,
                MotionPhase::Decelerating => saw_decel = true,
                MotionPhase::Complete => {}
            }
            executor.advance();
        }

        assert!(saw_accel);
        assert!(saw_cruise);
        assert!(saw_decel);
    }

    #[test]
    fn test_reset() {
        let mut executor = MotionExecutor::new(RampSchedule::trapezoidal(10, 50, half(750), half(500)));
        executor.advance();
        executor.advance();

        executor.reset();
        assert_eq!(executor.current_step(), 0);
        assert_eq!(executor.current_interval(), half(750));
    }
}
