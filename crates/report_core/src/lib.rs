//! # report_core: Domain Foundation for AML Regulatory Reporting
//!
//! ## Layer Role
//!
//! report_core is the bottom layer of the workspace, providing:
//! - Report records and their lifecycle status (`types::report`)
//! - Validation findings, results and regulator acknowledgments (`types::validation`)
//! - Parse errors for the enumerated wire values (`types::error`)
//! - The submission gate, the only business rule enforced client-side (`gate`)
//!
//! ## Zero I/O Principle
//!
//! Nothing in this crate performs network or file I/O. Everything here is a
//! plain value that the pipeline and the backend adapter pass around.
//!
//! ## Usage Examples
//!
//! ```rust
//! use report_core::gate::is_submittable;
//! use report_core::types::{Severity, ValidationFinding, ValidationResult};
//!
//! let clean = ValidationResult::passed();
//! assert!(is_submittable(&clean));
//!
//! let blocked = ValidationResult::failed(vec![ValidationFinding::new(
//!     "amount",
//!     "E01",
//!     "missing",
//!     Severity::Error,
//! )]);
//! assert!(!is_submittable(&blocked));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod gate;
pub mod types;

pub use gate::is_submittable;
pub use types::{
    Acknowledgment, AttachmentRef, Comment, CommentKind, CoreError, NewComment, Report,
    ReportStatus, ReportType, ReportUpdate, ReportingPeriod, Severity, ValidationFinding,
    ValidationResult,
};
