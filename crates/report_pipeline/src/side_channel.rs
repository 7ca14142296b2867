//! Comments, attachments and edits.
//!
//! None of these consult the submission gate. Comments and attachments are
//! allowed in any status; after each successful call the store entry is
//! replaced with the backend's canonical record rather than patched locally.

use adapter_backend::AttachmentUpload;
use report_core::{AttachmentRef, NewComment, Report, ReportUpdate};
use serde_json::json;
use tracing::{info, warn};

use crate::{AuditEventType, PipelineError, ReportPipeline};

impl ReportPipeline {
    /// Re-read one report from the backend into the store
    pub async fn refresh(&self, report_id: &str) -> Result<Report, PipelineError> {
        let report = self.call(self.backend.fetch_report(report_id)).await?;
        self.store.upsert(report.clone());
        Ok(report)
    }

    /// Refresh after a side-channel call; the call itself already succeeded,
    /// so a failed refresh only leaves the cached record stale.
    async fn refresh_after(&self, report_id: &str) {
        if let Err(e) = self.refresh(report_id).await {
            warn!(report_id, error = %e, "Store refresh failed; cached record is stale");
        }
    }

    /// Upload a file against a report
    pub async fn upload_attachment(
        &self,
        report_id: &str,
        file: AttachmentUpload,
    ) -> Result<AttachmentRef, PipelineError> {
        self.ensure_known(report_id)?;

        let size = file.bytes.len();
        let attachment = self
            .call(self.backend.upload_attachment(report_id, file))
            .await?;

        info!(report_id, attachment_id = %attachment.id, size, "Attachment uploaded");
        self.audit_event(
            AuditEventType::AttachmentUploaded,
            Some(report_id),
            json!({"attachment_id": attachment.id, "file_name": attachment.file_name, "size": size}),
        );
        self.refresh_after(report_id).await;
        Ok(attachment)
    }

    /// Add a comment to a report
    pub async fn add_comment(&self, report_id: &str, comment: NewComment) -> Result<(), PipelineError> {
        self.ensure_known(report_id)?;

        self.call(self.backend.add_comment(report_id, &comment))
            .await?;

        info!(report_id, kind = ?comment.kind, "Comment added");
        self.audit_event(
            AuditEventType::CommentAdded,
            Some(report_id),
            json!({"kind": comment.kind, "author": comment.author}),
        );
        self.refresh_after(report_id).await;
        Ok(())
    }

    /// Edit a report that has not been submitted yet
    pub async fn update_report(
        &self,
        report_id: &str,
        update: ReportUpdate,
    ) -> Result<Report, PipelineError> {
        let status = self
            .store
            .status(report_id)
            .ok_or_else(|| PipelineError::UnknownReport(report_id.to_string()))?;
        if !status.is_pre_submission() {
            return Err(PipelineError::NotEditable {
                report_id: report_id.to_string(),
                status,
            });
        }
        if update.is_empty() {
            return Err(PipelineError::EmptyUpdate(report_id.to_string()));
        }

        let report = self
            .call(self.backend.update_report(report_id, &update))
            .await?;
        self.store.upsert(report.clone());

        info!(report_id, "Report updated");
        self.audit_event(
            AuditEventType::ReportUpdated,
            Some(report_id),
            json!({
                "report_data": update.report_data.is_some(),
                "reporting_period": update.reporting_period.is_some(),
            }),
        );
        Ok(report)
    }
}
