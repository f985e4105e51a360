//! # fmsparse - FMS score reports to The Blue Alliance
//!
//! fmsparse reads the match score report the FRC Field Management System
//! writes after each match and turns it into the match record TBA expects.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ FMS Report  │────▶│   Report    │────▶│  Breakdown  │────▶│ TBA Record  │
//! │   (HTML)    │     │  (auto-enc) │     │ (per-row)   │     │   (JSON)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                            ▲
//!                     .extrajson sidecar
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fmsparse::{parse_report_file, ParseOptions};
//! use std::path::Path;
//!
//! let outcome = parse_report_file(Path::new("Q12.html"), &ParseOptions::default()).unwrap();
//! println!("Blue scored {}", outcome.record.alliances.blue.score);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (Side, FieldValue, MatchRecord)
//! - [`breakdown`] - Row classification, phases and defaults
//! - [`report`] - Report decoding, row extraction and sidecars
//! - [`pipeline`] - File/bytes to record
//! - [`validation`] - Output schema validation
//! - [`rankings`] - FMS to TBA rankings conversion
//! - [`config`] - Server configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod breakdown;
pub mod report;

// Orchestration
pub mod pipeline;

// Validation
pub mod validation;

// Rankings
pub mod rankings;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BreakdownError, CoerceError, ExtraInfoError, PhaseError, PipelineError, RankingsError,
    ReportError, RowError, ServerError, ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AllianceInfo, Breakdown, ExtraAllianceInfo, FieldValue, MatchRecord, PerSide, ReportRow,
    Side, SupplementalInfo,
};

// =============================================================================
// Re-exports - Breakdown
// =============================================================================

pub use breakdown::{default_breakdown, execute, execute_with_source, MatchPhase};

// =============================================================================
// Re-exports - Report Reading
// =============================================================================

pub use report::{
    decode_content, detect_encoding, extract_rows, load_sidecar, read_report_bytes,
    read_report_file, sidecar_path, Report,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{parse_report_bytes, parse_report_file, ParseOptions, ParseOutcome, ReportInfo};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid_match_record, validate_match_record};

// =============================================================================
// Re-exports - Rankings
// =============================================================================

pub use rankings::{read_rankings, FmsRanking, RankingsUpload, TbaRanking};

// =============================================================================
// Re-exports - Config & API
// =============================================================================

pub use config::ServerConfig;
pub use api::types::{error_response, ParseResponse};

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
