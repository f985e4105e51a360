//! Score breakdown parser for FMS match reports (2023 format).
//!
//! ```text
//! rows ──▶ classifier ──▶ RowEffect ──▶ accumulators ──▶ resolver ──▶ MatchRecord
//!              │  ▲                          (only if the whole row succeeded)
//!              ▼  │
//!          phase tracker        collector: failed rows → BreakdownError
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use fmsparse::breakdown::execute;
//! use fmsparse::models::{ReportRow, SupplementalInfo};
//!
//! let rows = vec![ReportRow::new(["Final Score", "100", "80"])];
//! let record = execute(&rows, &SupplementalInfo::default(), false)?;
//! assert_eq!(record.alliances.blue.score, 100);
//! ```

pub mod accumulator;
pub mod classifier;
pub mod coerce;
pub mod collector;
pub mod executor;
pub mod fields;
pub mod phase;
pub mod resolver;

pub use accumulator::{AllianceAccumulator, Accumulators, ScoreComponents};
pub use classifier::{LabeledRow, RowClassifier, RowEffect, ScoreComponent};
pub use collector::ErrorCollector;
pub use executor::{execute, execute_with_source};
pub use fields::default_breakdown;
pub use phase::{MatchPhase, PhaseTracker};
