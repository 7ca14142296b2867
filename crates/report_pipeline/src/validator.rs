//! Validator invoker.

use report_core::{is_submittable, ValidationResult};
use serde_json::json;
use tracing::{debug, warn};

use crate::{AuditEventType, PipelineError, ReportPipeline};

impl ReportPipeline {
    /// Validate one report through the backend.
    ///
    /// The result is recorded as the report's latest validation. A failed
    /// call yields [`PipelineError::Validation`], never a made-up result.
    pub async fn validate(&self, report_id: &str) -> Result<ValidationResult, PipelineError> {
        self.ensure_known(report_id)?;

        let result = self
            .call(self.backend.validate(report_id))
            .await
            .map_err(|source| {
                warn!(report_id, error = %source, "Validation call failed");
                PipelineError::Validation {
                    report_id: report_id.to_string(),
                    source,
                }
            })?;

        let errors = result.errors().count();
        let warnings = result.warnings().count();
        debug!(report_id, success = result.success, errors, warnings, "Validation completed");

        self.record_validation(report_id, &result);
        self.audit_event(
            AuditEventType::Validated,
            Some(report_id),
            json!({
                "success": result.success,
                "errors": errors,
                "warnings": warnings,
                "submittable": is_submittable(&result),
            }),
        );
        Ok(result)
    }
}
