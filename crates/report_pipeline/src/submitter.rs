//! Single-report submitter.

use chrono::Utc;
use report_core::is_submittable;
use serde_json::json;
use tracing::{info, warn};

use crate::{AuditEventType, PipelineError, ReportPipeline, SubmissionOutcome};

impl ReportPipeline {
    /// Validate, gate and submit one report.
    ///
    /// The backend submit endpoint is called only when the gate passes. The
    /// store changes only when the backend accepts the submission, and then
    /// status and submission time change together. Nothing is retried.
    pub async fn submit_one(&self, report_id: &str) -> SubmissionOutcome {
        let validation = match self.validate(report_id).await {
            Ok(validation) => validation,
            Err(error) => {
                self.audit_event(
                    AuditEventType::SubmissionFailed,
                    Some(report_id),
                    json!({"stage": "validate", "error": error.to_string()}),
                );
                return SubmissionOutcome::Failed {
                    report_id: report_id.to_string(),
                    validation: None,
                    error,
                };
            }
        };

        if !is_submittable(&validation) {
            info!(
                report_id,
                errors = validation.errors().count(),
                "Submission blocked by validation"
            );
            self.audit_event(
                AuditEventType::SubmissionBlocked,
                Some(report_id),
                json!({"codes": validation.errors().map(|f| f.code.as_str()).collect::<Vec<_>>()}),
            );
            return SubmissionOutcome::Blocked {
                report_id: report_id.to_string(),
                validation,
            };
        }

        let submission = match self.call(self.backend.submit(report_id)).await {
            Ok(submission) => submission,
            Err(source) => {
                warn!(report_id, error = %source, "Submit call failed");
                let error = PipelineError::Submission {
                    report_id: report_id.to_string(),
                    source,
                };
                self.audit_event(
                    AuditEventType::SubmissionFailed,
                    Some(report_id),
                    json!({"stage": "submit", "error": error.to_string()}),
                );
                return SubmissionOutcome::Failed {
                    report_id: report_id.to_string(),
                    validation: Some(validation),
                    error,
                };
            }
        };

        if !submission.success {
            warn!(report_id, findings = submission.findings.len(), "Backend rejected submission");
            self.audit_event(
                AuditEventType::SubmissionRejected,
                Some(report_id),
                json!({"findings": submission.findings.len()}),
            );
            return SubmissionOutcome::Rejected {
                report_id: report_id.to_string(),
                validation,
                submission,
            };
        }

        let submitted_at = Utc::now();
        if self
            .store
            .mark_submitted(report_id, submitted_at, submission.acknowledgment.clone())
            .is_none()
        {
            warn!(report_id, "Submission accepted but report already has a regulator verdict");
        }

        let reference = submission
            .acknowledgment
            .as_ref()
            .map(|ack| ack.reference_id.clone());
        info!(report_id, reference = ?reference, "Report submitted");
        self.audit_event(
            AuditEventType::Submitted,
            Some(report_id),
            json!({"reference": reference, "submitted_at": submitted_at}),
        );

        SubmissionOutcome::Submitted {
            report_id: report_id.to_string(),
            validation,
            submission,
            submitted_at,
        }
    }
}
