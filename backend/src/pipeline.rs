//! High-level pipeline: FMS report → TBA match record.
//!
//! Combines every step: reading and decoding, sidecar loading, row parsing
//! and the optional schema check.
//!
//! # Example
//!
//! ```rust,ignore
//! use fmsparse::pipeline::{parse_report_file, ParseOptions};
//! use std::path::Path;
//!
//! let outcome = parse_report_file(Path::new("Q12.html"), &ParseOptions::default())?;
//! println!("{}", serde_json::to_string_pretty(&outcome.record)?);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::breakdown::execute_with_source;
use crate::error::PipelineResult;
use crate::models::{MatchRecord, SupplementalInfo};
use crate::report::{self, Report};
use crate::validation::validate_match_record;

/// Schema errors shown in the log before the rest are summarized.
const MAX_LOGGED_SCHEMA_ERRORS: usize = 3;

/// Options for one report parse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Playoff match: no ranking points are awarded
    pub playoff: bool,

    /// Sidecar to use instead of the one next to the report
    pub extra_path: Option<PathBuf>,

    /// Skip the output schema check
    pub skip_validation: bool,
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub source: String,
    pub encoding: String,
    pub row_count: usize,
    pub data_row_count: usize,
    /// Where the supplemental info came from, if anywhere
    pub sidecar: Option<String>,
}

/// Result of a complete parse
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub record: MatchRecord,
    pub report: ReportInfo,
    /// Output schema violations; empty when valid or skipped
    pub schema_errors: Vec<String>,
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        self.schema_errors.is_empty()
    }
}

/// Parse a report file.
///
/// The sidecar is `options.extra_path` when given, otherwise the
/// `.extrajson` file next to the report (defaults when there is none).
pub fn parse_report_file(path: &Path, options: &ParseOptions) -> PipelineResult<ParseOutcome> {
    let source = path.display().to_string();
    log_info(format!("📖 Reading report {}...", source));
    let report = report::read_report_file(path)?;

    let (extra, sidecar) = match &options.extra_path {
        Some(extra_path) => (report::read_sidecar(extra_path)?, Some(extra_path.clone())),
        None => {
            let discovered = report::sidecar_path(path);
            let extra = report::load_sidecar(path)?;
            let found = discovered.exists().then_some(discovered);
            (extra, found)
        }
    };

    run(source, report, extra, sidecar.map(|p| p.display().to_string()), options)
}

/// Parse report bytes, e.g. an upload.
///
/// `extra` holds sidecar JSON sent alongside; otherwise `options.extra_path`
/// is used when set. There is no automatic discovery for bytes.
pub fn parse_report_bytes(
    bytes: &[u8],
    source: &str,
    extra: Option<&[u8]>,
    options: &ParseOptions,
) -> PipelineResult<ParseOutcome> {
    log_info(format!("📖 Reading report {}...", source));
    let report = report::read_report_bytes(bytes)?;

    let (extra, sidecar) = match (extra, &options.extra_path) {
        (Some(json), _) => {
            let origin = PathBuf::from(format!("{}.{}", source, report::SIDECAR_EXTENSION));
            (report::parse_sidecar(json, &origin)?, Some(origin.display().to_string()))
        }
        (None, Some(path)) => (report::read_sidecar(path)?, Some(path.display().to_string())),
        (None, None) => (SupplementalInfo::default(), None),
    };

    run(source.to_string(), report, extra, sidecar, options)
}

fn run(
    source: String,
    report: Report,
    extra: SupplementalInfo,
    sidecar: Option<String>,
    options: &ParseOptions,
) -> PipelineResult<ParseOutcome> {
    let info = ReportInfo {
        source,
        encoding: report.encoding.clone(),
        row_count: report.rows.len(),
        data_row_count: report.data_row_count(),
        sidecar,
    };
    log_success(format!("Detected encoding: {}", info.encoding));
    log_success(format!("Read {} rows ({} data rows)", info.row_count, info.data_row_count));
    match &info.sidecar {
        Some(path) => log_info_indent(format!("Supplemental info from {}", path), 1),
        None => log_info_indent("No supplemental info", 1),
    }

    log_info(if options.playoff {
        "🔄 Parsing playoff match..."
    } else {
        "🔄 Parsing match..."
    });
    let record = match execute_with_source(&info.source, &report.rows, &extra, options.playoff) {
        Ok(record) => record,
        Err(e) => {
            log_error(format!("{} row(s) failed in {}", e.rows().len(), info.source));
            return Err(e.into());
        }
    };
    log_success(format!(
        "Final score: blue {} - red {}",
        record.alliances.blue.score, record.alliances.red.score
    ));

    let schema_errors = if options.skip_validation {
        Vec::new()
    } else {
        log_info("✔️  Validating match record...");
        check(&record)?
    };

    Ok(ParseOutcome {
        record,
        report: info,
        schema_errors,
    })
}

fn check(record: &MatchRecord) -> PipelineResult<Vec<String>> {
    let value = serde_json::to_value(record)?;
    let errors = match validate_match_record(&value) {
        Ok(()) => {
            log_success("Match record valid");
            Vec::new()
        }
        Err(errors) => {
            for e in errors.iter().take(MAX_LOGGED_SCHEMA_ERRORS) {
                log_error(e.clone());
            }
            log_warning(format!("{} schema violation(s)", errors.len()));
            errors
        }
    };
    Ok(errors)
}
