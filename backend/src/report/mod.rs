//! FMS report reading with encoding auto-detection.
//!
//! Raw bytes are decoded (UTF-8, ISO-8859-1 or Windows-1252, detected with
//! chardet) and their table rows extracted. No breakdown logic here.

pub mod extra;
pub mod html;

use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::models::ReportRow;

pub use extra::{load_sidecar, parse_sidecar, read_sidecar, sidecar_path, SIDECAR_EXTENSION};
pub use html::{cell_text, decode_entities, extract_rows};

/// Decoded report with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Table rows in document order
    pub rows: Vec<ReportRow>,
    /// Detected encoding
    pub encoding: String,
}

impl Report {
    /// Rows with exactly three cells.
    pub fn data_row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_data_row()).count()
    }
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to text using the specified encoding.
///
/// Unknown encodings are looked up by label in encoding_rs before falling
/// back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ReportResult<String> {
    let text = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(enc) => {
                let (decoded, _, had_errors) = enc.decode(bytes);
                if had_errors {
                    return Err(ReportError::EncodingError(format!(
                        "invalid {} byte sequence",
                        enc.name()
                    )));
                }
                decoded.into_owned()
            }
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    Ok(text)
}

/// Read a report from raw bytes.
pub fn read_report_bytes(bytes: &[u8]) -> ReportResult<Report> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ReportError::EmptyReport);
    }

    let encoding = detect_encoding(bytes);
    let text = decode_content(bytes, &encoding)?;
    let rows = extract_rows(&text);
    if rows.is_empty() {
        return Err(ReportError::NoRows);
    }

    Ok(Report { rows, encoding })
}

/// Read a report file.
pub fn read_report_file<P: AsRef<Path>>(path: P) -> ReportResult<Report> {
    let bytes = std::fs::read(path)?;
    read_report_bytes(&bytes)
}
