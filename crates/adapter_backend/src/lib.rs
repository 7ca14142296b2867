//! # adapter_backend: Reporting Backend Adapter
//!
//! The client never validates, persists or forwards reports itself; all of
//! that lives in the reporting backend. This crate is the only place that
//! knows how to reach it.
//!
//! ## Modules
//!
//! - [`backend`]: the [`ReportingBackend`] trait the pipeline depends on
//! - [`error`]: [`BackendError`], the transport/backend failure taxonomy
//! - [`http`]: [`HttpBackend`], the reqwest implementation
//! - [`types`]: request/response shapes that only exist at this boundary

pub mod backend;
pub mod error;
pub mod http;
pub mod types;

pub use backend::ReportingBackend;
pub use error::BackendError;
pub use http::{HttpBackend, HttpBackendConfig};
pub use types::{AttachmentUpload, BatchItemResult, GoAmlStatus};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::ReportingBackend;
    pub use crate::error::BackendError;
    pub use crate::http::{HttpBackend, HttpBackendConfig};
    pub use crate::types::{AttachmentUpload, BatchItemResult, GoAmlStatus};
}
