//! # report_pipeline: Regulatory Report Validation & Submission
//!
//! Drives UAE Central Bank / goAML reports from draft to submitted:
//!
//! - **Validator**: one backend validation call per report ([`ReportPipeline::validate`])
//! - **Gate**: [`report_core::gate::is_submittable`], the only local business rule
//! - **Single submit**: validate, gate, submit, record ([`ReportPipeline::submit_one`])
//! - **Batch submit**: concurrent validation, one batch call with exactly the
//!   eligible ids, per-id outcome aggregation ([`ReportPipeline::submit_batch`])
//! - **Side-channel**: comments, attachments and edits that bypass the gate
//!
//! The [`ReportStore`] is the only shared mutable state. It changes only
//! through the operations above and through refreshes from the backend.

mod audit;
mod batch;
mod config;
mod error;
mod outcome;
mod side_channel;
mod store;
mod submitter;
mod validator;

pub use audit::{AuditEvent, AuditEventType, AuditLog};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use outcome::{BatchItemOutcome, BatchOutcome, SubmissionOutcome};
pub use store::{ReportStore, StoreStatistics};

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use adapter_backend::{BackendError, GoAmlStatus, ReportingBackend};
use report_core::ValidationResult;
use tracing::{info, warn};

/// Report validation and submission pipeline
pub struct ReportPipeline {
    backend: Arc<dyn ReportingBackend>,
    store: Arc<ReportStore>,
    audit: Arc<AuditLog>,
    /// Latest validation per report id, superseded on every run
    validations: RwLock<HashMap<String, ValidationResult>>,
    config: PipelineConfig,
}

impl ReportPipeline {
    /// Create a pipeline with an empty store
    pub fn new(backend: Arc<dyn ReportingBackend>, config: PipelineConfig) -> Self {
        Self::with_store(backend, Arc::new(ReportStore::new()), config)
    }

    /// Create a pipeline over an existing store
    pub fn with_store(
        backend: Arc<dyn ReportingBackend>,
        store: Arc<ReportStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            backend,
            store,
            audit: Arc::new(AuditLog::new()),
            validations: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Use a specific audit log
    pub fn with_audit_log(mut self, audit: Arc<AuditLog>) -> Self {
        self.audit = audit;
        self
    }

    /// The report store
    pub fn store(&self) -> &Arc<ReportStore> {
        &self.store
    }

    /// The audit trail
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// The configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the store contents with the backend's report list
    pub async fn load_reports(&self) -> Result<usize, PipelineError> {
        let reports = self.call(self.backend.list_reports()).await?;
        let count = reports.len();
        self.store.replace_all(reports);
        info!(count, "Reports loaded");
        Ok(count)
    }

    /// goAML bridge connectivity
    pub async fn goaml_status(&self) -> Result<GoAmlStatus, PipelineError> {
        Ok(self.call(self.backend.goaml_status()).await?)
    }

    /// Run a backend call under the configured timeout.
    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.config.call_timeout, "Backend call timed out");
                Err(BackendError::Timeout(self.config.call_timeout))
            }
        }
    }

    fn ensure_known(&self, report_id: &str) -> Result<(), PipelineError> {
        if self.store.contains(report_id) {
            Ok(())
        } else {
            Err(PipelineError::UnknownReport(report_id.to_string()))
        }
    }

    fn audit_event(
        &self,
        event_type: AuditEventType,
        report_id: Option<&str>,
        details: serde_json::Value,
    ) {
        self.audit
            .record(event_type, &self.config.actor, report_id, details);
    }

    fn record_validation(&self, report_id: &str, result: &ValidationResult) {
        self.validations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(report_id.to_string(), result.clone());
    }

    /// Latest validation result for a report, if it was validated this session
    pub fn latest_validation(&self, report_id: &str) -> Option<ValidationResult> {
        self.validations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(report_id)
            .cloned()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AuditEventType, AuditLog, BatchItemOutcome, BatchOutcome, PipelineConfig, PipelineError,
        ReportPipeline, ReportStore, SubmissionOutcome,
    };
    pub use adapter_backend::{AttachmentUpload, GoAmlStatus, ReportingBackend};
}
