//! Error types for the pipeline.

use adapter_backend::BackendError;
use report_core::ReportStatus;
use thiserror::Error;

/// Pipeline error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Report id not present in the store
    #[error("Unknown report: {0}")]
    UnknownReport(String),

    /// The validation call itself failed; no result was produced
    #[error("Validation of {report_id} failed: {source}")]
    Validation {
        /// Report being validated
        report_id: String,
        /// Underlying failure
        #[source]
        source: BackendError,
    },

    /// The submit call itself failed
    #[error("Submission of {report_id} failed: {source}")]
    Submission {
        /// Report being submitted
        report_id: String,
        /// Underlying failure
        #[source]
        source: BackendError,
    },

    /// The batch-submit call failed as a whole
    #[error("Batch submission failed: {0}")]
    BatchSubmission(#[source] BackendError),

    /// Report is past the point where it can be edited
    #[error("Report {report_id} is {status} and can no longer be edited")]
    NotEditable {
        /// Report being edited
        report_id: String,
        /// Its current status
        status: ReportStatus,
    },

    /// Update carried no change
    #[error("Update for report {0} is empty")]
    EmptyUpdate(String),

    /// Any other backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PipelineError {
    /// The backend failure behind this error, if any
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::Validation { source, .. } | Self::Submission { source, .. } => Some(source),
            Self::BatchSubmission(source) | Self::Backend(source) => Some(source),
            _ => None,
        }
    }
}
