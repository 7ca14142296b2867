//! Error types for parsing enumerated report values.

use thiserror::Error;

/// Errors raised when a wire or CLI value does not map onto a known variant.
///
/// # Examples
/// ```
/// use report_core::types::{CoreError, ReportType};
///
/// let err = "XYZ".parse::<ReportType>().unwrap_err();
/// assert_eq!(err, CoreError::UnknownReportType("XYZ".to_string()));
/// assert_eq!(format!("{}", err), "Unknown report type: XYZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Report type code is not one of STR, CTR, EFT, KYC, PERIODIC
    #[error("Unknown report type: {0}")]
    UnknownReportType(String),

    /// Status string is not part of the report lifecycle
    #[error("Unknown report status: {0}")]
    UnknownStatus(String),

    /// Severity string is neither `error` nor `warning`
    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    /// Comment kind is neither `internal` nor `regulatory`
    #[error("Unknown comment kind: {0}")]
    UnknownCommentKind(String),
}
