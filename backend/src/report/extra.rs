//! `.extrajson` sidecar loading.
//!
//! A report `match.html` may sit next to `match.extrajson` holding the
//! surrogates, DQs and penalties the report itself does not show.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ExtraInfoError;
use crate::models::SupplementalInfo;

pub const SIDECAR_EXTENSION: &str = "extrajson";

/// Sidecar path of a report: its extension replaced by `.extrajson`.
pub fn sidecar_path(report: &Path) -> PathBuf {
    report.with_extension(SIDECAR_EXTENSION)
}

/// Load the sidecar next to `report`; defaults when there is none.
pub fn load_sidecar(report: &Path) -> Result<SupplementalInfo, ExtraInfoError> {
    let path = sidecar_path(report);
    match std::fs::read(&path) {
        Ok(bytes) => parse_sidecar(&bytes, &path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(SupplementalInfo::default()),
        Err(source) => Err(ExtraInfoError::Io { path, source }),
    }
}

/// Load a sidecar given explicitly; it must exist.
pub fn read_sidecar(path: &Path) -> Result<SupplementalInfo, ExtraInfoError> {
    let bytes = std::fs::read(path).map_err(|source| ExtraInfoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sidecar(&bytes, path)
}

/// Parse sidecar JSON; `origin` names it in errors.
pub fn parse_sidecar(bytes: &[u8], origin: &Path) -> Result<SupplementalInfo, ExtraInfoError> {
    serde_json::from_slice(bytes).map_err(|source| ExtraInfoError::Json {
        path: origin.to_path_buf(),
        source,
    })
}
