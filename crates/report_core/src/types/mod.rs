//! Report, validation and error types.
//!
//! This module provides:
//! - `report`: Report records, status lifecycle, comments and attachments
//! - `validation`: Findings, validation results and submission acknowledgments
//! - `error`: Parse errors for enumerated values
//!
//! # Re-exports
//!
//! Commonly used types are re-exported at this module level.

pub mod error;
pub mod report;
pub mod validation;

pub use error::CoreError;
pub use report::{
    AttachmentRef, Comment, CommentKind, NewComment, Report, ReportStatus, ReportType,
    ReportUpdate, ReportingPeriod,
};
pub use validation::{Acknowledgment, Severity, ValidationFinding, ValidationResult};
