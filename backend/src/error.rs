//! Error types for the FMS report parser.
//!
//! This module defines the error hierarchy, from single cells up to the
//! pipeline and HTTP surfaces:
//!
//! - [`CoerceError`] - cell text that does not coerce to the field's type
//! - [`PhaseError`] - phase-dependent row outside of any match phase
//! - [`RowError`] - one failed report row (collected, never fatal on its own)
//! - [`BreakdownError`] - aggregate of every failed row in a report
//! - [`ReportError`] - unreadable or empty report source
//! - [`ExtraInfoError`] - malformed `.extrajson` sidecar
//! - [`RankingsError`] - rankings conversion errors
//! - [`ValidationError`] - output schema check failures
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP API errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Side;

// =============================================================================
// Cell Coercion Errors
// =============================================================================

/// Errors while turning cell text into a typed value.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// Text is not a base-10 integer.
    #[error("parse int {context} failed: {text:?}: {source}")]
    InvalidInteger {
        text: String,
        context: String,
        source: ParseIntError,
    },

    /// Text is not a recognised yes/no marker.
    #[error("parse bool {context} failed: {text:?} is not a yes/no value")]
    InvalidBoolean { text: String, context: String },

    /// A split cell produced the wrong number of tokens.
    #[error("{context}: expected {expected} values, found {found}")]
    TokenCount {
        context: String,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Phase Errors
// =============================================================================

/// Structural errors of the implicit match phase.
#[derive(Debug, Error)]
pub enum PhaseError {
    /// An endgame-specific row appeared while no phase was active.
    #[error("no active match phase: {label}")]
    NoActivePhase { label: String },
}

// =============================================================================
// Row Errors
// =============================================================================

/// Why a single row could not be classified.
#[derive(Debug, Error)]
pub enum RowFailure {
    /// A cell of one side failed to coerce.
    #[error("{source}")]
    Cell {
        side: Side,
        #[source]
        source: CoerceError,
    },

    /// The row needs an active match phase.
    #[error(transparent)]
    Phase(#[from] PhaseError),
}

impl RowFailure {
    pub fn cell(side: Side, source: CoerceError) -> Self {
        RowFailure::Cell { side, source }
    }

    /// Side whose cell failed, if the failure is tied to one side.
    pub fn side(&self) -> Option<Side> {
        match self {
            RowFailure::Cell { side, .. } => Some(*side),
            RowFailure::Phase(_) => None,
        }
    }
}

/// A report row that failed as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// Zero-based position of the row in the report.
    pub index: usize,
    /// Normalized row label.
    pub label: String,
    /// Side whose cell failed, when known.
    pub side: Option<Side>,
    pub message: String,
}

impl RowError {
    pub fn from_failure(index: usize, label: impl Into<String>, failure: &RowFailure) -> Self {
        Self {
            index,
            label: label.into(),
            side: failure.side(),
            message: failure.to_string(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "row {} '{}' ({}): {}", self.index, self.label, side, self.message),
            None => write!(f, "row {} '{}': {}", self.index, self.label, self.message),
        }
    }
}

impl std::error::Error for RowError {}

// =============================================================================
// Breakdown Errors
// =============================================================================

/// Errors returned by the breakdown parser.
#[derive(Debug, Error)]
pub enum BreakdownError {
    /// At least one row failed; no partial breakdown is produced.
    #[error("Parse error ({}):\n{}", .0.len(), join_rows(.0))]
    Rows(Vec<RowError>),
}

impl BreakdownError {
    /// Every collected row error, in table order.
    pub fn rows(&self) -> &[RowError] {
        match self {
            BreakdownError::Rows(rows) => rows,
        }
    }
}

fn join_rows(rows: &[RowError]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors while reading a report source.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to read file.
    #[error("Failed to read report: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the report text.
    #[error("Failed to decode report: {0}")]
    EncodingError(String),

    /// Empty file.
    #[error("Report is empty")]
    EmptyReport,

    /// No table rows found.
    #[error("No table rows found in report")]
    NoRows,
}

// =============================================================================
// Sidecar Errors
// =============================================================================

/// Errors while loading the supplemental `.extrajson` document.
#[derive(Debug, Error)]
pub enum ExtraInfoError {
    #[error("Error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error reading JSON from {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

// =============================================================================
// Rankings Errors
// =============================================================================

/// Errors during rankings conversion.
#[derive(Debug, Error)]
pub enum RankingsError {
    /// No TBA sort-order names are known for this year.
    #[error("Unsupported rankings year: {0}")]
    UnsupportedYear(u16),

    /// Input file extension is neither `.json` nor `.csv`.
    #[error("Unknown rankings format: {0}")]
    UnknownFormat(String),

    #[error("Rankings IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rankings CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Rankings JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors during output schema validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::parse_report_file`].
/// It wraps all lower-level errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Report reading error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Sidecar loading error.
    #[error("Extra info error: {0}")]
    ExtraInfo(#[from] ExtraInfoError),

    /// Row parsing error(s).
    #[error("{0}")]
    Breakdown(#[from] BreakdownError),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for cell coercion.
pub type CoerceResult<T> = Result<T, CoerceError>;

/// Result type for breakdown parsing.
pub type BreakdownResult<T> = Result<T, BreakdownError>;

/// Result type for report reading.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for rankings conversion.
pub type RankingsResult<T> = Result<T, RankingsError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ReportError -> PipelineError
        let report_err = ReportError::EmptyReport;
        let pipeline_err: PipelineError = report_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // PipelineError -> ServerError
        let server_err: ServerError = pipeline_err.into();
        assert!(matches!(server_err, ServerError::Pipeline(PipelineError::Report(_))));
    }

    #[test]
    fn test_row_error_format() {
        let failure = RowFailure::cell(
            Side::Red,
            CoerceError::TokenCount {
                context: "red teams".into(),
                expected: 3,
                found: 2,
            },
        );
        let err = RowError::from_failure(4, "teams", &failure);
        let msg = err.to_string();
        assert!(msg.contains("row 4 'teams'"));
        assert!(msg.contains("(red)"));
        assert!(msg.contains("expected 3 values, found 2"));
        assert_eq!(err.side, Some(Side::Red));
    }

    #[test]
    fn test_aggregate_lists_every_row() {
        let phase = RowFailure::from(PhaseError::NoActivePhase {
            label: "charge station".into(),
        });
        let err = BreakdownError::Rows(vec![
            RowError::from_failure(2, "charge station", &phase),
            RowError {
                index: 7,
                label: "final score".into(),
                side: Some(Side::Blue),
                message: "bad".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("Parse error (2):\n"));
        let charge = msg.find("charge station").unwrap();
        let score = msg.find("final score").unwrap();
        assert!(charge < score);
    }
}
