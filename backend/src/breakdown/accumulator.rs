//! Per-alliance accumulators filled while rows are consumed.

use crate::models::{
    AllianceInfo, Breakdown, MatchRecord, PerSide, Side, SupplementalInfo,
};

use super::classifier::{RowEffect, ScoreComponent};

/// Score components seen so far for one alliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreComponents {
    pub auto: i64,
    pub teleop: i64,
    pub fouls: i64,
    pub total: i64,
}

impl ScoreComponents {
    fn set(&mut self, component: ScoreComponent, value: i64) {
        match component {
            ScoreComponent::Auto => self.auto = value,
            ScoreComponent::Teleop => self.teleop = value,
            ScoreComponent::Fouls => self.fouls = value,
            ScoreComponent::Total => self.total = value,
        }
    }

    /// Points not explained by auto, teleop and fouls; negative when the
    /// components exceed the total. Clamped to the `i64` range.
    pub fn adjustment(&self) -> i64 {
        let exact = i128::from(self.total)
            - i128::from(self.auto)
            - i128::from(self.teleop)
            - i128::from(self.fouls);
        i64::try_from(exact).unwrap_or(if exact < 0 { i64::MIN } else { i64::MAX })
    }
}

/// Everything known about one alliance while parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllianceAccumulator {
    pub breakdown: Breakdown,
    pub info: AllianceInfo,
    pub score: ScoreComponents,
}

impl AllianceAccumulator {
    fn apply(&mut self, side: Side, effect: &RowEffect) {
        for (name, value) in effect.fields.get(side) {
            self.breakdown.insert(name.clone(), value.clone());
        }
        if let Some(teams) = &effect.teams {
            self.info.teams = teams.get(side).clone();
        }
        if let Some(score) = &effect.score {
            self.info.score = *score.get(side);
        }
        if let Some((component, values)) = &effect.component {
            self.score.set(*component, *values.get(side));
        }
    }
}

/// The accumulator pair of one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulators {
    sides: PerSide<AllianceAccumulator>,
}

impl Accumulators {
    /// Fresh accumulators with the sidecar's surrogates and DQs merged in.
    pub fn new(extra: &SupplementalInfo) -> Self {
        Self {
            sides: PerSide::from_fn(|side| AllianceAccumulator {
                info: AllianceInfo::from_extra(extra.get(side)),
                ..AllianceAccumulator::default()
            }),
        }
    }

    /// Apply a fully classified row to both sides.
    pub fn apply(&mut self, effect: &RowEffect) {
        for side in Side::ALL {
            self.sides.get_mut(side).apply(side, effect);
        }
    }

    pub fn side(&self, side: Side) -> &AllianceAccumulator {
        self.sides.get(side)
    }

    pub fn side_mut(&mut self, side: Side) -> &mut AllianceAccumulator {
        self.sides.get_mut(side)
    }

    pub fn into_record(self) -> MatchRecord {
        let PerSide { blue, red } = self.sides;
        MatchRecord {
            alliances: PerSide::new(blue.info, red.info),
            score_breakdown: PerSide::new(blue.breakdown, red.breakdown),
        }
    }
}
