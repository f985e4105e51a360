//! Derived and default values, filled in once every row has been read.

use crate::models::{Breakdown, ExtraAllianceInfo, FieldValue};

use super::accumulator::AllianceAccumulator;
use super::fields::{ADJUST_POINTS, DEFAULT_FIELDS, G405_PENALTY, H111_PENALTY, RANKING_POINTS, RP_BADGES};

/// Complete one alliance's breakdown.
///
/// Steps run in this order, each only touching what earlier steps (and the
/// rows) left absent, except playoff mode which always overrides:
/// adjustment points, playoff ranking points, sidecar penalties, defaults.
pub fn resolve(acc: &mut AllianceAccumulator, extra: &ExtraAllianceInfo, playoff: bool) {
    let adjustment = acc.score.adjustment();
    let breakdown = &mut acc.breakdown;

    set_if_absent(breakdown, ADJUST_POINTS, FieldValue::Integer(adjustment));

    if playoff {
        breakdown.insert(RANKING_POINTS.to_string(), FieldValue::Integer(0));
        for badge in RP_BADGES.values() {
            breakdown.insert(badge.to_string(), FieldValue::Boolean(false));
        }
    }

    set_if_absent(breakdown, G405_PENALTY, FieldValue::Boolean(extra.g405_penalty));
    set_if_absent(breakdown, H111_PENALTY, FieldValue::Boolean(extra.h111_penalty));

    for (name, value) in DEFAULT_FIELDS.iter() {
        set_if_absent(breakdown, name, value.clone());
    }
}

fn set_if_absent(breakdown: &mut Breakdown, name: &str, value: FieldValue) {
    breakdown.entry(name.to_string()).or_insert(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_total(total: i64) -> AllianceAccumulator {
        let mut acc = AllianceAccumulator::default();
        acc.score.total = total;
        acc.score.auto = 12;
        acc.score.teleop = 40;
        acc.score.fouls = 5;
        acc
    }

    #[test]
    fn test_adjust_points_derived() {
        let mut acc = with_total(60);
        resolve(&mut acc, &ExtraAllianceInfo::default(), false);
        assert_eq!(acc.breakdown[ADJUST_POINTS], FieldValue::Integer(3));
    }

    #[test]
    fn test_adjust_points_row_wins() {
        let mut acc = with_total(60);
        acc.breakdown.insert(ADJUST_POINTS.into(), FieldValue::Integer(-4));
        resolve(&mut acc, &ExtraAllianceInfo::default(), false);
        assert_eq!(acc.breakdown[ADJUST_POINTS], FieldValue::Integer(-4));
    }

    #[test]
    fn test_playoff_overrides_rows() {
        let mut acc = AllianceAccumulator::default();
        acc.breakdown.insert(RANKING_POINTS.into(), FieldValue::Integer(3));
        acc.breakdown.insert("cargoBonusRankingPoint".into(), FieldValue::Boolean(true));
        resolve(&mut acc, &ExtraAllianceInfo::default(), true);

        assert_eq!(acc.breakdown[RANKING_POINTS], FieldValue::Integer(0));
        assert_eq!(acc.breakdown["cargoBonusRankingPoint"], FieldValue::Boolean(false));
        assert_eq!(acc.breakdown["hangarBonusRankingPoint"], FieldValue::Boolean(false));
    }

    #[test]
    fn test_regular_match_keeps_rows() {
        let mut acc = AllianceAccumulator::default();
        acc.breakdown.insert(RANKING_POINTS.into(), FieldValue::Integer(3));
        resolve(&mut acc, &ExtraAllianceInfo::default(), false);
        assert_eq!(acc.breakdown[RANKING_POINTS], FieldValue::Integer(3));
    }

    #[test]
    fn test_penalties_from_sidecar() {
        let mut acc = AllianceAccumulator::default();
        let extra = ExtraAllianceInfo {
            h111_penalty: true,
            ..ExtraAllianceInfo::default()
        };
        resolve(&mut acc, &extra, false);
        assert_eq!(acc.breakdown[H111_PENALTY], FieldValue::Boolean(true));
        assert_eq!(acc.breakdown[G405_PENALTY], FieldValue::Boolean(false));
    }

    #[test]
    fn test_defaults_fill_gaps_only() {
        let mut acc = AllianceAccumulator::default();
        acc.breakdown.insert("linkPoints".into(), FieldValue::Integer(15));
        acc.breakdown.insert("teleopPoints".into(), FieldValue::Integer(44));
        resolve(&mut acc, &ExtraAllianceInfo::default(), false);

        assert_eq!(acc.breakdown["teleopPoints"], FieldValue::Integer(44));
        assert_eq!(acc.breakdown["linkPoints"], FieldValue::Integer(15));
        for (name, _) in DEFAULT_FIELDS.iter() {
            assert!(acc.breakdown.contains_key(*name), "missing {}", name);
        }
    }
}
