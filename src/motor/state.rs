//! Move state tracking.

/// Where the controller is within a move.
///
/// A move walks `Idle → DirectionSet → Enabled → Stepping → Done`. The
/// controller keeps the last state it reached, so a failed pin write leaves
/// the state at the last completed stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveState {
    /// No move has run yet.
    #[default]
    Idle,
    /// Direction line written.
    DirectionSet,
    /// Enable line asserted.
    Enabled,
    /// Emitting step pulses.
    Stepping,
    /// All pulses emitted and hold policy applied.
    Done,
}

impl MoveState {
    /// Get the state name as a static string.
    pub fn name(self) -> &'static str {
        match self {
            MoveState::Idle => "Idle",
            MoveState::DirectionSet => "DirectionSet",
            MoveState::Enabled => "Enabled",
            MoveState::Stepping => "Stepping",
            MoveState::Done => "Done",
        }
    }

    /// Check if a move is between setup and completion.
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            MoveState::DirectionSet | MoveState::Enabled | MoveState::Stepping
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(MoveState::default(), MoveState::Idle);
        assert_eq!(MoveState::default().name(), "Idle");
    }

    #[test]
    fn test_in_progress() {
        assert!(!MoveState::Idle.is_in_progress());
        assert!(MoveState::DirectionSet.is_in_progress());
        assert!(MoveState::Enabled.is_in_progress());
        assert!(MoveState::Stepping.is_in_progress());
        assert!(!MoveState::Done.is_in_progress());
    }

    #[test]
    fn test_names() {
        assert_eq!(MoveState::Stepping.name(), "Stepping");
        assert_eq!(MoveState::Done.name(), "Done");
    }
}
