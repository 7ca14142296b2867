//! Submission gate.
//!
//! The single business rule the client enforces locally: a report may be
//! submitted only when its latest validation produced no `error` finding and
//! the backend reported success. Everything else is delegated to the backend.
//!
//! # Examples
//!
//! ```
//! use report_core::gate::is_submittable;
//! use report_core::types::{Severity, ValidationFinding, ValidationResult};
//!
//! let warnings_only = ValidationResult::with_findings(vec![ValidationFinding::new(
//!     "narrative",
//!     "W03",
//!     "narrative is short",
//!     Severity::Warning,
//! )]);
//! assert!(is_submittable(&warnings_only));
//!
//! // A failed run is never submittable, even without findings.
//! assert!(!is_submittable(&ValidationResult::failed(vec![])));
//! ```

use crate::types::{ValidationFinding, ValidationResult};

/// Whether `result` allows the report to proceed to submission.
pub fn is_submittable(result: &ValidationResult) -> bool {
    result.success && !result.has_errors()
}

/// The findings that keep `result` from passing the gate.
pub fn blocking_findings(result: &ValidationResult) -> Vec<ValidationFinding> {
    result.errors().cloned().collect()
}
