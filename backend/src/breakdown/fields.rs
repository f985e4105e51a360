//! Field dispatch tables for the 2023 report format.
//!
//! Maps normalized (lowercase, trimmed) FMS row labels to TBA breakdown
//! field names. Tables are built once and only read afterwards.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::models::{Breakdown, FieldValue};

/// Key prefix of rows no table knows about.
pub const UNKNOWN_PREFIX: &str = "!";

/// Labels of header rows that carry no data.
pub const HEADER_LABELS: &[&str] = &["match score item"];

pub const ADJUST_POINTS: &str = "adjustPoints";
pub const TOTAL_POINTS: &str = "totalPoints";
pub const RANKING_POINTS: &str = "rp";
pub const G405_PENALTY: &str = "g405Penalty";
pub const H111_PENALTY: &str = "h111Penalty";

/// Integer fields read straight from both cells.
pub static DIRECT_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("coop game piece count", "coopGamePieceCount"),
        ("mobility points", "autoMobilityPoints"),
        ("endgame park points", "endGameParkPoints"),
        ("link points", "linkPoints"),
        ("adjustments", ADJUST_POINTS),
    ])
});

/// Integer fields named after the current phase (`auto` / `teleop` + suffix).
pub static PHASE_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("game piece count", "GamePieceCount"),
        ("game piece points", "GamePiecePoints"),
    ])
});

const FOUL_COUNT_FIELDS: &[&str] = &["foulCount", "techFoulCount"];

/// Integer fields packed into one cell, split on the bullet separator.
pub static SPLIT_FIELDS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| HashMap::from([("fouls/techs committed", FOUL_COUNT_FIELDS)]));

/// Bonus ranking point badges (boolean).
pub static RP_BADGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("cargo bonus ranking point achieved", "cargoBonusRankingPoint"),
        ("hangar bonus ranking point achieved", "hangarBonusRankingPoint"),
    ])
});

/// Rows with bespoke handling beyond a single value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialRow {
    Teams,
    FinalScore,
    RankingPoints,
    AutonomousPoints,
    TeleopPoints,
    FoulPoints,
    ChargeStation,
}

impl SpecialRow {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "teams" => Some(SpecialRow::Teams),
            "final score" => Some(SpecialRow::FinalScore),
            "ranking points" => Some(SpecialRow::RankingPoints),
            "autonomous points" => Some(SpecialRow::AutonomousPoints),
            "teleop points" => Some(SpecialRow::TeleopPoints),
            "foul points" => Some(SpecialRow::FoulPoints),
            "charge station" => Some(SpecialRow::ChargeStation),
            _ => None,
        }
    }
}

/// Field-name suffix of per-robot charge station states.
pub const CHARGE_STATION_SUFFIX: &str = "ChargeStationRobot";

/// Number of robots (and teams) per alliance.
pub const ROBOTS_PER_ALLIANCE: usize = 3;

/// Every canonical field with its default value.
pub static DEFAULT_FIELDS: Lazy<Vec<(&'static str, FieldValue)>> = Lazy::new(|| {
    let zero = |name: &'static str| (name, FieldValue::Integer(0));
    let no = |name: &'static str| (name, FieldValue::Boolean(false));
    let text = |name: &'static str, value: &str| (name, FieldValue::String(value.to_string()));

    vec![
        zero(ADJUST_POINTS),
        zero("autoCargoLowerBlue"),
        zero("autoCargoLowerFar"),
        zero("autoCargoLowerNear"),
        zero("autoCargoLowerRed"),
        zero("autoCargoPoints"),
        zero("autoCargoTotal"),
        zero("autoCargoUpperBlue"),
        zero("autoCargoUpperFar"),
        zero("autoCargoUpperNear"),
        zero("autoCargoUpperRed"),
        zero("autoPoints"),
        zero("autoTaxiPoints"),
        no("cargoBonusRankingPoint"),
        zero("endgamePoints"),
        text("endgameRobot1", "None"),
        text("endgameRobot2", "None"),
        text("endgameRobot3", "None"),
        zero("foulCount"),
        zero("foulPoints"),
        no(G405_PENALTY),
        no(H111_PENALTY),
        no("hangarBonusRankingPoint"),
        zero("matchCargoTotal"),
        no("quintetAchieved"),
        zero(RANKING_POINTS),
        text("taxiRobot1", "No"),
        text("taxiRobot2", "No"),
        text("taxiRobot3", "No"),
        zero("techFoulCount"),
        zero("teleopCargoLowerBlue"),
        zero("teleopCargoLowerFar"),
        zero("teleopCargoLowerNear"),
        zero("teleopCargoLowerRed"),
        zero("teleopCargoPoints"),
        zero("teleopCargoTotal"),
        zero("teleopCargoUpperBlue"),
        zero("teleopCargoUpperFar"),
        zero("teleopCargoUpperNear"),
        zero("teleopCargoUpperRed"),
        zero("teleopPoints"),
        zero(TOTAL_POINTS),
    ]
});

/// A breakdown holding only default values.
pub fn default_breakdown() -> Breakdown {
    DEFAULT_FIELDS
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Key under which an unknown row is stored.
pub fn unknown_key(label: &str) -> String {
    format!("{}{}", UNKNOWN_PREFIX, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_do_not_overlap() {
        let mut seen = HashSet::new();
        let labels = DIRECT_FIELDS
            .keys()
            .chain(PHASE_FIELDS.keys())
            .chain(SPLIT_FIELDS.keys())
            .chain(RP_BADGES.keys());
        for label in labels {
            assert!(seen.insert(*label), "label {} in two tables", label);
            assert!(SpecialRow::from_label(label).is_none());
        }
    }

    #[test]
    fn test_labels_are_normalized() {
        for label in DIRECT_FIELDS.keys().chain(PHASE_FIELDS.keys()).chain(RP_BADGES.keys()) {
            assert_eq!(*label, label.trim().to_lowercase());
        }
    }

    #[test]
    fn test_defaults_cover_badges_and_split_fields() {
        let defaults = default_breakdown();
        assert_eq!(defaults.len(), DEFAULT_FIELDS.len());
        for field in RP_BADGES.values() {
            assert_eq!(defaults[*field], FieldValue::Boolean(false));
        }
        for fields in SPLIT_FIELDS.values() {
            for field in fields.iter() {
                assert_eq!(defaults[*field], FieldValue::Integer(0));
            }
        }
        assert_eq!(defaults[ADJUST_POINTS], FieldValue::Integer(0));
        assert_eq!(defaults["taxiRobot2"], FieldValue::from("No"));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(unknown_key("widget count"), "!widget count");
    }
}
