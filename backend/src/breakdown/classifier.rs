//! Row classification.
//!
//! Each data row is matched against the dispatch tables and named rows in a
//! fixed priority order and turned into a [`RowEffect`]: every write the row
//! makes, for both sides. Nothing is applied here, so a row that fails
//! half-way leaves no trace in the accumulators.
//!
//! Priority: direct fields → phase fields → teams → final score →
//! ranking points → RP badges → autonomous points → teleop points →
//! foul points → fouls/techs committed → charge station → passthrough.

use crate::error::{CoerceError, RowFailure};
use crate::models::{FieldValue, PerSide, ReportRow, Side};

use super::coerce::{self, BULLET, LINE};
use super::fields::{
    self, SpecialRow, CHARGE_STATION_SUFFIX, DIRECT_FIELDS, HEADER_LABELS, PHASE_FIELDS,
    ROBOTS_PER_ALLIANCE, RP_BADGES, SPLIT_FIELDS,
};
use super::phase::PhaseTracker;

/// Score components tracked per side for derived fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreComponent {
    Auto,
    Teleop,
    Fouls,
    Total,
}

/// Everything one row writes, for both sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowEffect {
    /// Breakdown writes, in order.
    pub fields: PerSide<Vec<(String, FieldValue)>>,
    /// Team keys (`teams` row).
    pub teams: Option<PerSide<Vec<String>>>,
    /// Alliance final score (`final score` row).
    pub score: Option<PerSide<i64>>,
    /// Score component fed to the resolver.
    pub component: Option<(ScoreComponent, PerSide<i64>)>,
}

impl RowEffect {
    fn field(name: &str, values: PerSide<FieldValue>) -> Self {
        Self::default().with_field(name, values)
    }

    fn with_field(mut self, name: &str, values: PerSide<FieldValue>) -> Self {
        self.fields.blue.push((name.to_string(), values.blue));
        self.fields.red.push((name.to_string(), values.red));
        self
    }

    fn with_component(mut self, component: ScoreComponent, values: PerSide<i64>) -> Self {
        self.component = Some((component, values));
        self
    }
}

/// A data row with its label normalized and cells trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub label: String,
    pub cells: PerSide<String>,
}

impl LabeledRow {
    /// Normalize a report row; `None` for header, separator and empty rows.
    pub fn from_report(row: &ReportRow) -> Option<Self> {
        if !row.is_data_row() {
            return None;
        }
        let label = row.cells[0].trim().to_lowercase();
        if label.is_empty() || HEADER_LABELS.contains(&label.as_str()) {
            return None;
        }
        let cells = PerSide::from_fn(|side| row.cells[side.cell_index()].trim().to_string());
        Some(Self { label, cells })
    }

    fn context(&self, side: Side) -> String {
        format!("{} {}", side, self.label)
    }

    /// Apply `f` to both cells, attributing a failure to its side.
    fn both<T>(
        &self,
        mut f: impl FnMut(&str, &str) -> Result<T, CoerceError>,
    ) -> Result<PerSide<T>, RowFailure> {
        self.cells
            .clone()
            .try_map(|side, text| f(&text, &self.context(side)).map_err(|e| RowFailure::cell(side, e)))
    }

    fn ints(&self) -> Result<PerSide<i64>, RowFailure> {
        self.both(coerce::parse_int)
    }
}

/// Turns rows into effects; owns the phase of the report being parsed.
#[derive(Debug, Default)]
pub struct RowClassifier {
    phase: PhaseTracker,
}

impl RowClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &PhaseTracker {
        &self.phase
    }

    /// Normalize a row and apply any phase change triggered by seeing it.
    pub fn prepare(&mut self, row: &ReportRow) -> Option<LabeledRow> {
        let labeled = LabeledRow::from_report(row)?;
        self.phase.row_seen(&labeled.label);
        Some(labeled)
    }

    /// Apply the phase change of a row that parsed successfully.
    pub fn commit(&mut self, row: &LabeledRow) {
        self.phase.row_parsed(&row.label);
    }

    /// Compute every write of `row`.
    pub fn classify(&self, row: &LabeledRow) -> Result<RowEffect, RowFailure> {
        let label = row.label.as_str();

        if let Some(field) = DIRECT_FIELDS.get(label) {
            return Ok(RowEffect::field(field, row.ints()?.map(|_, n| n.into())));
        }

        if let Some(suffix) = PHASE_FIELDS.get(label) {
            let field = format!("{}{}", self.phase.prefix(), suffix);
            return Ok(RowEffect::field(&field, row.ints()?.map(|_, n| n.into())));
        }

        let special = SpecialRow::from_label(label);
        match special {
            Some(SpecialRow::Teams) => return self.teams(row),
            Some(SpecialRow::FinalScore) => {
                let scores = row.ints()?;
                let mut effect = RowEffect::field(fields::TOTAL_POINTS, scores.clone().map(|_, n| n.into()))
                    .with_component(ScoreComponent::Total, scores.clone());
                effect.score = Some(scores);
                return Ok(effect);
            }
            Some(SpecialRow::RankingPoints) => {
                return Ok(RowEffect::field(fields::RANKING_POINTS, row.ints()?.map(|_, n| n.into())));
            }
            _ => {}
        }

        if let Some(field) = RP_BADGES.get(label) {
            let flags = row.both(coerce::parse_bool)?;
            return Ok(RowEffect::field(field, flags.map(|_, b| b.into())));
        }

        match special {
            Some(SpecialRow::AutonomousPoints) => return points(row, "autoPoints", ScoreComponent::Auto),
            Some(SpecialRow::TeleopPoints) => return points(row, "teleopPoints", ScoreComponent::Teleop),
            Some(SpecialRow::FoulPoints) => return points(row, "foulPoints", ScoreComponent::Fouls),
            _ => {}
        }

        if let Some(names) = SPLIT_FIELDS.get(label) {
            let values = row.both(|text, context| coerce::split_ints(text, BULLET, names.len(), context))?;
            let mut effect = RowEffect::default();
            for (i, name) in names.iter().enumerate() {
                effect = effect.with_field(name, PerSide::new(values.blue[i].into(), values.red[i].into()));
            }
            return Ok(effect);
        }

        if special == Some(SpecialRow::ChargeStation) {
            return self.charge_station(row);
        }

        let raw = row.cells.clone().map(|_, text| FieldValue::String(text));
        Ok(RowEffect::field(&fields::unknown_key(label), raw))
    }

    fn teams(&self, row: &LabeledRow) -> Result<RowEffect, RowFailure> {
        let teams = row.both(|text, context| {
            coerce::split_exact(text, LINE, ROBOTS_PER_ALLIANCE, context)
                .map(|tokens| tokens.iter().map(|t| team_key(t)).collect::<Vec<_>>())
        })?;
        Ok(RowEffect {
            teams: Some(teams),
            ..RowEffect::default()
        })
    }

    fn charge_station(&self, row: &LabeledRow) -> Result<RowEffect, RowFailure> {
        let prefix = self.phase.endgame_prefix(&row.label)?;
        let states = row.both(|text, context| coerce::split_exact(text, LINE, ROBOTS_PER_ALLIANCE, context))?;

        let mut effect = RowEffect::default();
        for robot in 0..ROBOTS_PER_ALLIANCE {
            let field = format!("{}{}{}", prefix, CHARGE_STATION_SUFFIX, robot + 1);
            let values = PerSide::new(
                FieldValue::String(states.blue[robot].clone()),
                FieldValue::String(states.red[robot].clone()),
            );
            effect = effect.with_field(&field, values);
        }
        Ok(effect)
    }
}

/// A points row that also feeds a score component.
fn points(row: &LabeledRow, field: &str, component: ScoreComponent) -> Result<RowEffect, RowFailure> {
    let values = row.ints()?;
    Ok(RowEffect::field(field, values.clone().map(|_, n| n.into())).with_component(component, values))
}

/// TBA team key for a team number as printed in the report.
fn team_key(team: &str) -> String {
    if team.starts_with("frc") {
        team.to_string()
    } else {
        format!("frc{}", team)
    }
}
