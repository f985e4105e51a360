//! JSON Schema validation of produced match records.
//!
//! The 2023 record schema (`schemas/fms-match-2023.json`, Draft 7) is
//! embedded at compile time. It requires both alliances with exactly three
//! team slots and every canonical breakdown field with its fixed type;
//! phase fields and unknown (`!`-prefixed) rows are allowed on top.
//!
//! # Example
//!
//! ```rust,ignore
//! use fmsparse::validation::validate_match_record;
//!
//! let value = serde_json::to_value(&record)?;
//! if let Err(errors) = validate_match_record(&value) {
//!     for e in errors {
//!         eprintln!("{}", e);
//!     }
//! }
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::ValidationError;
use crate::models::MatchRecord;

static MATCH_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/fms-match-2023.json"))
        .expect("Invalid embedded schema")
});

/// Validate `data` against a Draft 7 schema.
///
/// Returns every violation message when invalid.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate a serialized match record.
pub fn validate_match_record(data: &Value) -> Result<(), Vec<String>> {
    validate(&MATCH_SCHEMA, data)
}

/// Quick check of a serialized match record.
pub fn is_valid_match_record(data: &Value) -> bool {
    is_valid(&MATCH_SCHEMA, data)
}

/// Serialize and validate a record.
pub fn check_match_record(record: &MatchRecord) -> Result<(), ValidationError> {
    let value = serde_json::to_value(record).map_err(|e| ValidationError::SchemaError {
        errors: vec![e.to_string()],
    })?;
    validate_match_record(&value).map_err(|errors| ValidationError::SchemaError { errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::execute;
    use crate::models::{ReportRow, SupplementalInfo};

    fn produced() -> MatchRecord {
        let rows = vec![
            ReportRow::new(["Teams", "254\n1678\n971", "118\n148\n2056"]),
            ReportRow::new(["Mobility", "Yes\nNo\nNo", "No\nNo\nNo"]),
            ReportRow::new(["Charge Station", "Docked\nNone\nNone", "None\nNone\nNone"]),
            ReportRow::new(["Widget Count", "1", "2"]),
            ReportRow::new(["Final Score", "100", "80"]),
        ];
        execute(&rows, &SupplementalInfo::default(), false).unwrap()
    }

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(jsonschema::draft7::new(&MATCH_SCHEMA).is_ok());
    }

    #[test]
    fn test_produced_record_is_valid() {
        let record = produced();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(validate_match_record(&value), Ok(()));
        assert!(check_match_record(&record).is_ok());
    }

    #[test]
    fn test_missing_canonical_field() {
        let mut value = serde_json::to_value(produced()).unwrap();
        value["score_breakdown"]["red"]
            .as_object_mut()
            .unwrap()
            .remove("foulCount");

        assert!(!is_valid_match_record(&value));
        let errors = validate_match_record(&value).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("foulCount")));
    }

    #[test]
    fn test_wrong_field_type() {
        let mut value = serde_json::to_value(produced()).unwrap();
        value["score_breakdown"]["blue"]["rp"] = serde_json::json!("two");
        assert!(!is_valid_match_record(&value));
    }

    #[test]
    fn test_team_slots() {
        let mut value = serde_json::to_value(produced()).unwrap();
        value["alliances"]["blue"]["teams"] = serde_json::json!(["frc254"]);
        assert!(!is_valid_match_record(&value));
    }
}
