//! Implicit match phase tracking.
//!
//! FMS reports never say which phase a row belongs to; the phase follows
//! from sentinel rows seen in document order:
//!
//! ```text
//! None ──"mobility"──▶ Auto ──"autonomous points"──▶ Teleop ──"teleop points"──▶ None
//! ```
//!
//! `"mobility"` opens the autonomous section as soon as the row is seen.
//! The two points rows close their section, so the move happens only once
//! the closing row itself parsed.

use serde::Serialize;

use crate::error::PhaseError;

/// Label that opens the autonomous section.
pub const AUTO_START: &str = "mobility";
/// Label that closes the autonomous section.
pub const AUTO_END: &str = "autonomous points";
/// Label that closes the teleop section.
pub const TELEOP_END: &str = "teleop points";

/// Temporal segment of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPhase {
    #[default]
    None,
    Auto,
    Teleop,
}

impl MatchPhase {
    /// Field-name prefix of this phase (empty outside of a phase).
    pub fn prefix(&self) -> &'static str {
        match self {
            MatchPhase::None => "",
            MatchPhase::Auto => "auto",
            MatchPhase::Teleop => "teleop",
        }
    }
}

/// Phase entered when a row with `label` is seen.
pub fn on_row_seen(current: MatchPhase, label: &str) -> MatchPhase {
    if label == AUTO_START {
        MatchPhase::Auto
    } else {
        current
    }
}

/// Phase entered once a row with `label` parsed successfully.
pub fn on_row_parsed(current: MatchPhase, label: &str) -> MatchPhase {
    match label {
        AUTO_END => MatchPhase::Teleop,
        TELEOP_END => MatchPhase::None,
        _ => current,
    }
}

/// Current phase of one report being parsed.
#[derive(Debug, Clone, Default)]
pub struct PhaseTracker {
    phase: MatchPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> MatchPhase {
        self.phase
    }

    /// Field-name prefix of the current phase.
    pub fn prefix(&self) -> &'static str {
        self.phase.prefix()
    }

    /// Prefix for endgame-specific rows: teleop rows belong to the endgame.
    pub fn endgame_prefix(&self, label: &str) -> Result<&'static str, PhaseError> {
        match self.phase {
            MatchPhase::None => Err(PhaseError::NoActivePhase {
                label: label.to_string(),
            }),
            MatchPhase::Auto => Ok("auto"),
            MatchPhase::Teleop => Ok("endGame"),
        }
    }

    pub fn row_seen(&mut self, label: &str) {
        self.phase = on_row_seen(self.phase, label);
    }

    pub fn row_parsed(&mut self, label: &str) {
        self.phase = on_row_parsed(self.phase, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut tracker = PhaseTracker::new();
        assert_eq!(tracker.current(), MatchPhase::None);

        tracker.row_seen("mobility");
        assert_eq!(tracker.current(), MatchPhase::Auto);
        assert_eq!(tracker.prefix(), "auto");

        tracker.row_seen("autonomous points");
        assert_eq!(tracker.current(), MatchPhase::Auto);
        tracker.row_parsed("autonomous points");
        assert_eq!(tracker.current(), MatchPhase::Teleop);
        assert_eq!(tracker.prefix(), "teleop");

        tracker.row_parsed("teleop points");
        assert_eq!(tracker.current(), MatchPhase::None);
        assert_eq!(tracker.prefix(), "");
    }

    #[test]
    fn test_other_labels_keep_phase() {
        assert_eq!(on_row_seen(MatchPhase::Teleop, "game piece count"), MatchPhase::Teleop);
        assert_eq!(on_row_parsed(MatchPhase::Auto, "mobility"), MatchPhase::Auto);
    }

    #[test]
    fn test_endgame_prefix() {
        let mut tracker = PhaseTracker::new();
        let err = tracker.endgame_prefix("charge station").unwrap_err();
        assert!(err.to_string().contains("charge station"));

        tracker.row_seen("mobility");
        assert_eq!(tracker.endgame_prefix("charge station").unwrap(), "auto");

        tracker.row_parsed("autonomous points");
        assert_eq!(tracker.endgame_prefix("charge station").unwrap(), "endGame");
    }
}
