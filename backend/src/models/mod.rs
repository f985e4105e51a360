//! Domain models for FMS match score reports.
//!
//! This module contains the data structures shared by the parser, the
//! pipeline and the API:
//!
//! - [`Side`] - one of the two alliances (blue / red)
//! - [`PerSide`] - a value held once per alliance
//! - [`FieldValue`] - typed value of a single breakdown field
//! - [`Breakdown`] - flat field-name → value map of one alliance
//! - [`AllianceInfo`] - teams, surrogates, DQs and final score of one alliance
//! - [`ExtraAllianceInfo`] / [`SupplementalInfo`] - `.extrajson` sidecar contents
//! - [`MatchRecord`] - the complete TBA-compatible match record
//! - [`ReportRow`] - one extracted table row of a report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Sides
// =============================================================================

/// One of the two competing alliances.
///
/// FMS reports list the blue alliance in the first value column and the
/// red alliance in the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// Both sides, in report column order.
    pub const ALL: [Side; 2] = [Side::Blue, Side::Red];

    /// Lowercase name used in keys and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Blue => "blue",
            Side::Red => "red",
        }
    }

    /// Index of this side's cell within a three-cell report row.
    pub fn cell_index(&self) -> usize {
        match self {
            Side::Blue => 1,
            Side::Red => 2,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held once per alliance; serializes as `{"blue": .., "red": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSide<T> {
    #[serde(default)]
    pub blue: T,
    #[serde(default)]
    pub red: T,
}

impl<T> PerSide<T> {
    pub fn new(blue: T, red: T) -> Self {
        Self { blue, red }
    }

    /// Build both sides from the same constructor.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            blue: f(Side::Blue),
            red: f(Side::Red),
        }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> PerSide<U> {
        PerSide {
            blue: f(Side::Blue, self.blue),
            red: f(Side::Red, self.red),
        }
    }

    /// Convert both sides, failing on the first side that fails.
    pub fn try_map<U, E>(self, mut f: impl FnMut(Side, T) -> Result<U, E>) -> Result<PerSide<U>, E> {
        Ok(PerSide {
            blue: f(Side::Blue, self.blue)?,
            red: f(Side::Red, self.red)?,
        })
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// One table row of a report: its cell texts in column order.
///
/// Data rows have three cells (label, blue, red); anything else is a
/// header or separator row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub cells: Vec<String>,
}

impl ReportRow {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the row carries a label and exactly one cell per side.
    pub fn is_data_row(&self) -> bool {
        self.cells.len() == 3
    }
}

// =============================================================================
// Breakdown Values
// =============================================================================

/// Typed value of one breakdown field.
///
/// The variant is fixed by the field's identity; serialized as the bare
/// JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Boolean(bool),
    String(String),
    StringList(Vec<String>),
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(list: Vec<String>) -> Self {
        FieldValue::StringList(list)
    }
}

/// Flat score breakdown of one alliance (field name → value).
pub type Breakdown = BTreeMap<String, FieldValue>;

// =============================================================================
// Alliance Metadata
// =============================================================================

/// Score value of an alliance whose final score row has not been seen.
pub const SCORE_NOT_OBSERVED: i64 = -1;

/// Per-alliance metadata of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceInfo {
    /// Team keys (`frc<number>`), always three entries.
    pub teams: Vec<String>,
    pub surrogates: Vec<String>,
    pub dqs: Vec<String>,
    /// Final score, [`SCORE_NOT_OBSERVED`] until the report provides it.
    pub score: i64,
}

impl AllianceInfo {
    /// Fresh metadata seeded with the sidecar's surrogates and DQs.
    pub fn from_extra(extra: &ExtraAllianceInfo) -> Self {
        Self {
            teams: vec![String::new(); 3],
            surrogates: extra.surrogates.clone(),
            dqs: extra.dqs.clone(),
            score: SCORE_NOT_OBSERVED,
        }
    }
}

impl Default for AllianceInfo {
    fn default() -> Self {
        Self::from_extra(&ExtraAllianceInfo::default())
    }
}

// =============================================================================
// Supplemental Info
// =============================================================================

/// Per-alliance contents of the `.extrajson` sidecar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraAllianceInfo {
    #[serde(default)]
    pub dqs: Vec<String>,
    #[serde(default)]
    pub surrogates: Vec<String>,
    #[serde(default)]
    pub g405_penalty: bool,
    #[serde(default)]
    pub h111_penalty: bool,
}

/// Supplemental information for both alliances; empty when no sidecar exists.
pub type SupplementalInfo = PerSide<ExtraAllianceInfo>;

// =============================================================================
// Match Record
// =============================================================================

/// Complete parsed match, in the shape TBA expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub alliances: PerSide<AllianceInfo>,
    pub score_breakdown: PerSide<Breakdown>,
}

impl MatchRecord {
    /// Breakdown field of one side.
    pub fn field(&self, side: Side, name: &str) -> Option<&FieldValue> {
        self.score_breakdown.get(side).get(name)
    }
}
