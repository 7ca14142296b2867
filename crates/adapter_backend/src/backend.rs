//! The backend contract the pipeline depends on.

use async_trait::async_trait;
use report_core::{AttachmentRef, NewComment, Report, ReportUpdate, ValidationResult};

use crate::error::BackendError;
use crate::types::{AttachmentUpload, BatchItemResult, GoAmlStatus};

/// Reporting backend operations.
///
/// Implementations perform exactly one remote call per method and never
/// retry. Validation rules, persistence and regulator bridging are entirely
/// the backend's concern.
#[async_trait]
pub trait ReportingBackend: Send + Sync {
    /// `GET /reports`
    async fn list_reports(&self) -> Result<Vec<Report>, BackendError>;

    /// `GET /reports/{id}`: the canonical record
    async fn fetch_report(&self, report_id: &str) -> Result<Report, BackendError>;

    /// `POST /reports/{id}/validate`
    async fn validate(&self, report_id: &str) -> Result<ValidationResult, BackendError>;

    /// `POST /reports/{id}/submit`; `acknowledgment` is populated on success
    async fn submit(&self, report_id: &str) -> Result<ValidationResult, BackendError>;

    /// `POST /reports/batch-submit` with exactly `report_ids`
    async fn batch_submit(&self, report_ids: &[String]) -> Result<Vec<BatchItemResult>, BackendError>;

    /// `PATCH /reports/{id}`: returns the updated record
    async fn update_report(
        &self,
        report_id: &str,
        update: &ReportUpdate,
    ) -> Result<Report, BackendError>;

    /// `POST /reports/{id}/attachments` (multipart)
    async fn upload_attachment(
        &self,
        report_id: &str,
        file: AttachmentUpload,
    ) -> Result<AttachmentRef, BackendError>;

    /// `POST /reports/{id}/comments`
    async fn add_comment(&self, report_id: &str, comment: &NewComment) -> Result<(), BackendError>;

    /// `GET /goaml/status`
    async fn goaml_status(&self) -> Result<GoAmlStatus, BackendError>;
}
