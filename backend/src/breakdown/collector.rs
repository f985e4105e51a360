//! Per-row error isolation.
//!
//! A row that fails is recorded and skipped; the rest of the table is still
//! parsed so the final error lists every broken row at once.

use crate::api::logs::log_row_warning;
use crate::error::{BreakdownError, BreakdownResult, RowError, RowFailure};

/// Collects row failures of one report, in table order.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    source: String,
    errors: Vec<RowError>,
}

impl ErrorCollector {
    /// `source` names the report in log messages.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            errors: Vec::new(),
        }
    }

    /// Run one row; a failure is recorded and `None` returned.
    pub fn run<T>(
        &mut self,
        index: usize,
        label: &str,
        row: impl FnOnce() -> Result<T, RowFailure>,
    ) -> Option<T> {
        match row() {
            Ok(value) => Some(value),
            Err(failure) => {
                let err = RowError::from_failure(index, label, &failure);
                log_row_warning(&self.source, format!("Parse error in {}: {}", self.source, err));
                self.errors.push(err);
                None
            }
        }
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fail with every collected error, or succeed if there were none.
    pub fn finish(self) -> BreakdownResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(BreakdownError::Rows(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoerceError, PhaseError};
    use crate::models::Side;

    fn bad_cell(side: Side) -> RowFailure {
        RowFailure::cell(
            side,
            CoerceError::InvalidBoolean {
                text: "?".into(),
                context: format!("{} badge", side),
            },
        )
    }

    #[test]
    fn test_success_passes_value_through() {
        let mut collector = ErrorCollector::new("test");
        assert_eq!(collector.run(0, "final score", || Ok(7)), Some(7));
        assert!(collector.is_empty());
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_failures_are_collected_in_order() {
        let mut collector = ErrorCollector::new("test");
        assert_eq!(collector.run::<()>(3, "badge", || Err(bad_cell(Side::Red))), None);
        assert_eq!(collector.run(4, "link points", || Ok(1)), Some(1));
        let phase = PhaseError::NoActivePhase {
            label: "charge station".into(),
        };
        assert_eq!(collector.run::<()>(9, "charge station", || Err(phase.into())), None);

        assert_eq!(collector.errors().len(), 2);
        let err = collector.finish().unwrap_err();
        let rows = err.rows();
        assert_eq!(rows[0].index, 3);
        assert_eq!(rows[0].side, Some(Side::Red));
        assert_eq!(rows[1].label, "charge station");
        assert_eq!(rows[1].side, None);
    }
}
