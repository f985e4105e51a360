//! REST API types.
//!
//! The parsed record is returned as-is under `match`, ready to be posted to
//! TBA; everything else is metadata for the caller.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::RowError;
use crate::models::MatchRecord;
use crate::pipeline::{ParseOutcome, ReportInfo};

/// Response sent after a report upload is parsed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready" or "warning" (schema violations)
    pub status: String,

    /// RFC 3339 time the parse finished
    pub parsed_at: String,

    /// TBA match record
    #[serde(rename = "match")]
    pub record: MatchRecord,

    pub metadata: ResponseMetadata,
}

/// Metadata about the parse
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub playoff: bool,
    pub report: ReportInfo,
    pub schema_errors: Vec<String>,
}

impl ParseResponse {
    pub fn new(outcome: ParseOutcome, playoff: bool) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            status: if outcome.is_valid() { "ready" } else { "warning" }.to_string(),
            parsed_at: chrono::Utc::now().to_rfc3339(),
            record: outcome.record,
            metadata: ResponseMetadata {
                playoff,
                report: outcome.report,
                schema_errors: outcome.schema_errors,
            },
        }
    }
}

/// One failed row, as reported to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowErrorInfo {
    pub row_index: usize,
    pub label: String,
    pub side: Option<String>,
    pub message: String,
}

impl From<&RowError> for RowErrorInfo {
    fn from(e: &RowError) -> Self {
        Self {
            row_index: e.index,
            label: e.label.clone(),
            side: e.side.map(|s| s.to_string()),
            message: e.message.clone(),
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    error_response_with_rows(error, &[])
}

/// Create an error response listing failed rows
pub fn error_response_with_rows(error: &str, rows: &[RowError]) -> Value {
    let rows: Vec<RowErrorInfo> = rows.iter().map(RowErrorInfo::from).collect();
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "rowErrors": rows,
        "match": null
    })
}
