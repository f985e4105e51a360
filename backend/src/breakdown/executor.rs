//! Single-pass parse of one report table into a match record.

use crate::error::BreakdownResult;
use crate::models::{MatchRecord, ReportRow, Side, SupplementalInfo};

use super::accumulator::Accumulators;
use super::classifier::RowClassifier;
use super::collector::ErrorCollector;
use super::resolver;

/// Source name used in log messages when the caller gives none.
const DEFAULT_SOURCE: &str = "report";

/// Parse `rows` (document order) into a match record.
///
/// Every failing row is reported in the returned error; no partial record
/// is produced in that case.
pub fn execute(rows: &[ReportRow], extra: &SupplementalInfo, playoff: bool) -> BreakdownResult<MatchRecord> {
    execute_with_source(DEFAULT_SOURCE, rows, extra, playoff)
}

/// Same as [`execute`], naming the report in row warnings.
pub fn execute_with_source(
    source: &str,
    rows: &[ReportRow],
    extra: &SupplementalInfo,
    playoff: bool,
) -> BreakdownResult<MatchRecord> {
    let mut classifier = RowClassifier::new();
    let mut accumulators = Accumulators::new(extra);
    let mut collector = ErrorCollector::new(source);

    for (index, row) in rows.iter().enumerate() {
        let Some(labeled) = classifier.prepare(row) else {
            continue;
        };
        if let Some(effect) = collector.run(index, &labeled.label, || classifier.classify(&labeled)) {
            accumulators.apply(&effect);
            classifier.commit(&labeled);
        }
    }

    for side in Side::ALL {
        resolver::resolve(accumulators.side_mut(side), extra.get(side), playoff);
    }

    collector.finish()?;
    Ok(accumulators.into_record())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::fields::DEFAULT_FIELDS;
    use crate::error::BreakdownError;
    use crate::models::{ExtraAllianceInfo, FieldValue};

    fn row(label: &str, blue: &str, red: &str) -> ReportRow {
        ReportRow::new([label, blue, red])
    }

    fn parse(rows: &[ReportRow]) -> MatchRecord {
        execute(rows, &SupplementalInfo::default(), false).unwrap()
    }

    #[test]
    fn test_final_score_only() {
        let record = parse(&[row("final score", "100", "80")]);

        assert_eq!(record.alliances.blue.score, 100);
        assert_eq!(record.alliances.red.score, 80);
        assert_eq!(record.field(Side::Blue, "adjustPoints"), Some(&FieldValue::Integer(100)));
        assert_eq!(record.field(Side::Red, "adjustPoints"), Some(&FieldValue::Integer(80)));
        assert_eq!(record.field(Side::Red, "totalPoints"), Some(&FieldValue::Integer(80)));
        for (name, value) in DEFAULT_FIELDS.iter() {
            if matches!(*name, "adjustPoints" | "totalPoints") {
                continue;
            }
            assert_eq!(record.field(Side::Blue, name), Some(value), "field {}", name);
        }
        assert_eq!(record.alliances.blue.teams, vec!["", "", ""]);
    }

    #[test]
    fn test_full_table() {
        let rows = [
            ReportRow::new(["Match Score Item", "Blue", "Red"]),
            row("Teams", "254\n1678\n971", "118\n148\n2056"),
            row("Mobility", "Yes\nYes\nNo", "No\nNo\nNo"),
            row("Game Piece Count", "3", "2"),
            row("Charge Station", "Docked\nNone\nNone", "None\nNone\nNone"),
            row("Autonomous Points", "21", "9"),
            row("Game Piece Count", "12", "10"),
            row("Charge Station", "Park\nDocked\nEngaged", "None\nPark\nPark"),
            row("Teleop Points", "60", "45"),
            row("Link Points", "15", "10"),
            row("Foul Points", "5", "0"),
            row("Fouls/Techs Committed", "0•0", "1•0"),
            row("Final Score", "90", "54"),
            row("Ranking Points", "2", "0"),
        ];
        let record = parse(&rows);

        assert_eq!(record.alliances.blue.teams, vec!["frc254", "frc1678", "frc971"]);
        assert_eq!(record.field(Side::Blue, "autoGamePieceCount"), Some(&FieldValue::Integer(3)));
        assert_eq!(record.field(Side::Blue, "teleopGamePieceCount"), Some(&FieldValue::Integer(12)));
        assert_eq!(
            record.field(Side::Blue, "autoChargeStationRobot1"),
            Some(&FieldValue::from("Docked"))
        );
        assert_eq!(
            record.field(Side::Blue, "endGameChargeStationRobot3"),
            Some(&FieldValue::from("Engaged"))
        );
        assert_eq!(record.field(Side::Red, "foulCount"), Some(&FieldValue::Integer(1)));
        // 90 - 21 - 60 - 5
        assert_eq!(record.field(Side::Blue, "adjustPoints"), Some(&FieldValue::Integer(4)));
        assert_eq!(record.field(Side::Blue, "rp"), Some(&FieldValue::Integer(2)));
        assert_eq!(record.field(Side::Blue, "!mobility"), Some(&FieldValue::from("Yes\nYes\nNo")));
    }

    #[test]
    fn test_playoff_zeroes_ranking_points() {
        let rows = [row("final score", "10", "20")];
        let record = execute(&rows, &SupplementalInfo::default(), true).unwrap();

        for side in Side::ALL {
            assert_eq!(record.field(side, "rp"), Some(&FieldValue::Integer(0)));
            assert_eq!(record.field(side, "cargoBonusRankingPoint"), Some(&FieldValue::Boolean(false)));
            assert_eq!(record.field(side, "hangarBonusRankingPoint"), Some(&FieldValue::Boolean(false)));
        }
    }

    #[test]
    fn test_bad_cell_aggregates() {
        let mut rows = vec![
            row("final score", "100", "80"),
            row("link points", "5", "five"),
            row("foul points", "0", "5"),
        ];
        let err = execute(&rows, &SupplementalInfo::default(), false).unwrap_err();

        let BreakdownError::Rows(errors) = &err;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[0].label, "link points");
        assert_eq!(errors[0].side, Some(Side::Red));
        assert!(err.to_string().starts_with("Parse error (1):"));

        rows.remove(1);
        let record = parse(&rows);
        assert_eq!(record.field(Side::Red, "foulPoints"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn test_every_bad_row_is_reported() {
        let rows = [
            row("link points", "x", "1"),
            row("ranking points", "1", "y"),
            row("charge station", "None\nNone\nNone", "None\nNone\nNone"),
        ];
        let err = execute(&rows, &SupplementalInfo::default(), false).unwrap_err();
        let indices: Vec<_> = err.rows().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_row_kept_as_strings() {
        let record = parse(&[row("widget count", "3", "5")]);
        assert_eq!(record.field(Side::Blue, "!widget count"), Some(&FieldValue::from("3")));
        assert_eq!(record.field(Side::Red, "!widget count"), Some(&FieldValue::from("5")));
    }

    #[test]
    fn test_fouls_split() {
        let record = parse(&[row("fouls/techs committed", "2•1", "0•3")]);
        assert_eq!(record.field(Side::Blue, "foulCount"), Some(&FieldValue::Integer(2)));
        assert_eq!(record.field(Side::Blue, "techFoulCount"), Some(&FieldValue::Integer(1)));
        assert_eq!(record.field(Side::Red, "techFoulCount"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn test_sidecar_merged() {
        let extra = SupplementalInfo::new(
            ExtraAllianceInfo {
                g405_penalty: true,
                surrogates: vec!["frc971".into()],
                ..ExtraAllianceInfo::default()
            },
            ExtraAllianceInfo {
                dqs: vec!["frc118".into()],
                ..ExtraAllianceInfo::default()
            },
        );
        let record = execute(&[row("final score", "1", "2")], &extra, false).unwrap();
        assert_eq!(record.alliances.blue.surrogates, vec!["frc971"]);
        assert_eq!(record.alliances.red.dqs, vec!["frc118"]);
        assert_eq!(record.field(Side::Blue, "g405Penalty"), Some(&FieldValue::Boolean(true)));
        assert_eq!(record.field(Side::Red, "g405Penalty"), Some(&FieldValue::Boolean(false)));
    }

    #[test]
    fn test_failed_closing_row_keeps_auto_phase() {
        let rows = [
            row("mobility", "", ""),
            row("autonomous points", "12", "??"),
            row("game piece count", "4", "5"),
        ];
        let err = execute(&rows, &SupplementalInfo::default(), false).unwrap_err();
        assert_eq!(err.rows().len(), 1);

        let mut fixed = rows.to_vec();
        fixed.remove(1);
        let record = parse(&fixed);
        assert_eq!(record.field(Side::Red, "autoGamePieceCount"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn test_extreme_scores_clamp_adjustment() {
        let record = parse(&[
            row("autonomous points", "-5", "0"),
            row("final score", "9223372036854775807", "0"),
        ]);
        assert_eq!(record.alliances.blue.score, i64::MAX);
        assert_eq!(record.field(Side::Blue, "adjustPoints"), Some(&FieldValue::Integer(i64::MAX)));
        assert_eq!(record.field(Side::Red, "adjustPoints"), Some(&FieldValue::Integer(0)));
    }

    #[test]
    fn test_calls_share_no_state() {
        let rows = [row("mobility", "", ""), row("game piece count", "1", "2")];
        let first = parse(&rows);
        let second = parse(&rows);
        assert_eq!(first, second);
        assert_eq!(first.field(Side::Blue, "autoGamePieceCount"), Some(&FieldValue::Integer(1)));
    }
}
