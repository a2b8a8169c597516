//! Ramp schedule calculation.
//!
//! Provides flat and linear trapezoidal step schedules. The interval of each
//! step is derived from its index, so a schedule can be sampled at any point
//! without replaying earlier steps.

use libm::round;

use super::timing::StepInterval;

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise, direction line high (positive step count).
    Forward,
    /// Counter-clockwise, direction line low (negative step count).
    Reverse,
}

impl Direction {
    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }

    /// Get the opposite direction.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Phase of a step within a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Interval moving from the initial toward the target interval.
    Accelerating,
    /// Constant target interval.
    Cruising,
    /// Interval moving from the target back toward the initial interval.
    Decelerating,
    /// Past the last step.
    Complete,
}

/// Per-move step timing schedule.
///
/// Invariant: `accel_boundary <= decel_boundary <= total_steps`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampSchedule {
    /// Total steps in the move.
    pub total_steps: u32,

    /// Steps with index below this are accelerating.
    pub accel_boundary: u32,

    /// Steps with index at or above this are decelerating.
    pub decel_boundary: u32,

    /// Half interval of the first and last step of a ramped move.
    pub initial_interval: StepInterval,

    /// Half interval while cruising.
    pub target_interval: StepInterval,

    /// Change of the half interval per ramp step, in nanoseconds.
    ///
    /// Positive when the initial speed is slower than the target speed.
    pub increment_ns: f64,
}

impl RampSchedule {
    /// Create a schedule where every step uses the target interval.
    pub fn flat(total_steps: u32, target_interval: StepInterval) -> Self {
        Self {
            total_steps,
            accel_boundary: 0,
            decel_boundary: total_steps,
            initial_interval: target_interval,
            target_interval,
            increment_ns: 0.0,
        }
    }

    /// Create a linear trapezoidal schedule.
    ///
    /// `accel_percent` of the move is spent ramping, half of it accelerating
    /// from `initial_interval` to `target_interval` and half decelerating back.
    /// A percentage of zero gives a [`flat`](Self::flat) schedule.
    ///
    /// The ramp length is clamped to `(total_steps - 1) / 2` so the two ramps
    /// never cross. Both ramps then take the same number of increments and
    /// the last step runs at `initial_interval` again.
    pub fn trapezoidal(
        total_steps: u32,
        accel_percent: u8,
        initial_interval: StepInterval,
        target_interval: StepInterval,
    ) -> Self {
        if accel_percent == 0 {
            return Self::flat(total_steps, target_interval);
        }

        // floor(n * (p / 100) / 2) without float rounding
        let ramp_steps = (total_steps as u64 * accel_percent.min(100) as u64 / 200) as u32;
        let ramp_steps = ramp_steps.min(total_steps.saturating_sub(1) / 2);

        let accel_boundary = ramp_steps;
        let decel_boundary = total_steps.saturating_sub(1 + ramp_steps);

        let increment_ns = if ramp_steps > 0 {
            (initial_interval.half_ns() as f64 - target_interval.half_ns() as f64)
                / ramp_steps as f64
        } else {
            0.0
        };

        Self {
            total_steps,
            accel_boundary,
            decel_boundary,
            initial_interval,
            target_interval,
            increment_ns,
        }
    }

    /// Check if this is a zero-length schedule.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.total_steps == 0
    }

    /// Check if every step runs at the target interval.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.accel_boundary == 0 && self.decel_boundary == self.total_steps
    }

    /// Steps allotted to each of the two ramps.
    #[inline]
    pub fn ramp_steps(&self) -> u32 {
        self.accel_boundary
    }

    /// Get the phase at a given step index.
    pub fn phase_at(&self, step: u32) -> MotionPhase {
        if step >= self.total_steps {
            MotionPhase::Complete
        } else if step < self.accel_boundary {
            MotionPhase::Accelerating
        } else if step < self.decel_boundary {
            MotionPhase::Cruising
        } else {
            MotionPhase::Decelerating
        }
    }

    /// Half interval used for the step at `step`.
    ///
    /// The interval shrinks by `increment_ns` after each accelerating step and
    /// grows by it after each step at or past the deceleration boundary.
    pub fn interval_at(&self, step: u32) -> StepInterval {
        if self.is_flat() {
            return self.target_interval;
        }

        let step = step.min(self.total_steps.saturating_sub(1));
        let accelerated = step.min(self.accel_boundary) as f64;
        let decelerated = step.saturating_sub(self.decel_boundary) as f64;

        let initial = self.initial_interval.half_ns() as f64;
        let target = self.target_interval.half_ns() as f64;
        let raw = initial - self.increment_ns * accelerated + self.increment_ns * decelerated;

        let (lo, hi) = if initial <= target {
            (initial, target)
        } else {
            (target, initial)
        };
        let half_ns = round(raw.clamp(lo, hi)).max(1.0);

        StepInterval::from_half_ns(half_ns as u32)
    }

    /// Iterate the half interval of every step in order.
    pub fn intervals(&self) -> impl Iterator<Item = StepInterval> + '_ {
        (0..self.total_steps).map(move |step| self.interval_at(step))
    }

    /// Total duration of the move in nanoseconds.
    pub fn duration_ns(&self) -> u64 {
        self.intervals().map(StepInterval::period_ns).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half(us: u32) -> StepInterval {
        StepInterval::from_half_ns(us * 1000)
    }

    #[test]
    fn test_flat_schedule() {
        let schedule = RampSchedule::trapezoidal(10, 0, half(750), half(500));

        assert!(schedule.is_flat());
        assert_eq!(schedule.ramp_steps(), 0);
        assert!(schedule.intervals().all(|i| i == half(500)));
        assert_eq!(schedule.phase_at(0), MotionPhase::Cruising);
        assert_eq!(schedule.phase_at(9), MotionPhase::Cruising);
        assert_eq!(schedule.phase_at(10), MotionPhase::Complete);
    }

    #[test]
    fn test_half_ramp_boundaries() {
        // 200 steps, 50% ramp: 50 steps accelerating, 50 decelerating
        let schedule = RampSchedule::trapezoidal(200, 50, half(750), half(500));

        assert_eq!(schedule.ramp_steps(), 50);
        assert_eq!(schedule.accel_boundary, 50);
        assert_eq!(schedule.decel_boundary, 149);
        assert!((schedule.increment_ns - 5000.0).abs() < 1e-9);

        assert_eq!(schedule.interval_at(0), half(750));
        assert_eq!(schedule.interval_at(1), half(745));
        assert_eq!(schedule.interval_at(50), half(500));
        assert_eq!(schedule.interval_at(149), half(500));
        assert_eq!(schedule.interval_at(150), half(505));
        assert_eq!(schedule.interval_at(199), half(750));
    }

    #[test]
    fn test_phases() {
        let schedule = RampSchedule::trapezoidal(200, 50, half(750), half(500));

        assert_eq!(schedule.phase_at(0), MotionPhase::Accelerating);
        assert_eq!(schedule.phase_at(49), MotionPhase::Accelerating);
        assert_eq!(schedule.phase_at(50), MotionPhase::Cruising);
        assert_eq!(schedule.phase_at(148), MotionPhase::Cruising);
        assert_eq!(schedule.phase_at(149), MotionPhase::Decelerating);
        assert_eq!(schedule.phase_at(199), MotionPhase::Decelerating);
        assert_eq!(schedule.phase_at(200), MotionPhase::Complete);
    }

    #[test]
    fn test_full_ramp_keeps_boundaries_ordered() {
        // 100%: 49 increments each way, cruise only at steps 49 and 50
        let schedule = RampSchedule::trapezoidal(100, 100, half(750), half(500));

        assert_eq!(schedule.accel_boundary, 49);
        assert_eq!(schedule.decel_boundary, 50);
        assert_eq!(schedule.interval_at(49), half(500));
        assert_eq!(schedule.interval_at(50), half(500));
        assert_eq!(schedule.interval_at(99), half(750));
        assert!(schedule.intervals().all(|i| i >= half(500) && i <= half(750)));
    }

    #[test]
    fn test_overlapping_ramps_end_at_initial_interval() {
        for total_steps in [2, 3, 4, 5, 10, 99, 100, 101] {
            let schedule = RampSchedule::trapezoidal(total_steps, 100, half(750), half(500));

            assert!(schedule.accel_boundary <= schedule.decel_boundary);
            assert_eq!(schedule.interval_at(0), half(750), "n = {}", total_steps);
            assert_eq!(
                schedule.interval_at(total_steps - 1),
                half(750),
                "n = {}",
                total_steps
            );
        }

        // n = 4: one increment each way
        let schedule = RampSchedule::trapezoidal(4, 100, half(750), half(500));
        let intervals: Vec<StepInterval> = schedule.intervals().collect();
        assert_eq!(intervals, [half(750), half(500), half(500), half(750)]);
    }

    #[test]
    fn test_short_move_without_ramp_steps() {
        // floor(1 * 0.5 / 2) = 0: no room to ramp, run at the initial interval
        let schedule = RampSchedule::trapezoidal(1, 50, half(750), half(500));

        assert_eq!(schedule.ramp_steps(), 0);
        assert_eq!(schedule.increment_ns, 0.0);
        assert_eq!(schedule.interval_at(0), half(750));
    }

    #[test]
    fn test_zero_steps() {
        let schedule = RampSchedule::trapezoidal(0, 50, half(750), half(500));

        assert!(schedule.is_zero());
        assert_eq!(schedule.accel_boundary, 0);
        assert_eq!(schedule.decel_boundary, 0);
        assert_eq!(schedule.intervals().count(), 0);
        assert_eq!(schedule.duration_ns(), 0);
    }

    #[test]
    fn test_initial_faster_than_target() {
        // Negative increment: interval grows toward the slower cruise
        let schedule = RampSchedule::trapezoidal(40, 50, half(500), half(750));

        assert!(schedule.increment_ns < 0.0);
        assert_eq!(schedule.interval_at(0), half(500));
        assert_eq!(schedule.interval_at(schedule.accel_boundary), half(750));
        assert_eq!(schedule.interval_at(39), half(500));
    }

    #[test]
    fn test_duration_flat() {
        let schedule = RampSchedule::flat(10, half(750));
        assert_eq!(schedule.duration_ns(), 10 * 1_500_000);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::Forward.opposite(), Direction::Reverse);
        assert_eq!(Direction::Reverse.sign(), -1);
    }
}
