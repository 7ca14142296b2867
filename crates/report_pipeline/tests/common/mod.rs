//! Scriptable in-memory backend shared by the pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use adapter_backend::{AttachmentUpload, BackendError, BatchItemResult, GoAmlStatus, ReportingBackend};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use report_core::{
    Acknowledgment, AttachmentRef, Comment, NewComment, Report, ReportStatus, ReportType,
    ReportUpdate, ReportingPeriod, Severity, ValidationFinding, ValidationResult,
};
use report_pipeline::prelude::*;

/// A recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Fetch(String),
    Validate(String),
    Submit(String),
    BatchSubmit(Vec<String>),
    Update(String),
    Upload(String),
    Comment(String),
    Status,
}

#[derive(Default)]
struct Script {
    validations: HashMap<String, ValidationResult>,
    validation_failures: HashSet<String>,
    hanging_validations: HashSet<String>,
    submit_rejections: HashSet<String>,
    submit_failures: HashSet<String>,
    batch_rejections: HashSet<String>,
    batch_omissions: HashSet<String>,
    batch_failure: Option<BackendError>,
    fetch_failures: HashSet<String>,
}

/// In-memory stand-in for the reporting backend
#[derive(Default)]
pub struct StubBackend {
    reports: Mutex<HashMap<String, Report>>,
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

pub fn period() -> ReportingPeriod {
    ReportingPeriod {
        start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap(),
    }
}

pub fn draft(id: &str) -> Report {
    Report::draft(id, ReportType::Str, period())
        .with_data(serde_json::json!({"amount": 125000, "currency": "AED"}))
}

pub fn error_finding() -> ValidationFinding {
    ValidationFinding::new("amount", "E01", "missing", Severity::Error)
}

pub fn warning_finding() -> ValidationFinding {
    ValidationFinding::new("narrative", "W03", "narrative is short", Severity::Warning)
}

fn acknowledgment(id: &str) -> Acknowledgment {
    Acknowledgment {
        reference_id: format!("GOAML-{}", id),
        submission_date: Utc::now(),
        status: "RECEIVED".to_string(),
        message: None,
    }
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report(self, report: Report) -> Self {
        self.reports
            .lock()
            .unwrap()
            .insert(report.id.clone(), report);
        self
    }

    pub fn validation(self, id: &str, result: ValidationResult) -> Self {
        self.script
            .lock()
            .unwrap()
            .validations
            .insert(id.to_string(), result);
        self
    }

    pub fn fail_validation_call(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .validation_failures
            .insert(id.to_string());
        self
    }

    pub fn hang_validation(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .hanging_validations
            .insert(id.to_string());
        self
    }

    pub fn reject_submit(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .submit_rejections
            .insert(id.to_string());
        self
    }

    pub fn fail_submit_call(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .submit_failures
            .insert(id.to_string());
        self
    }

    pub fn reject_in_batch(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .batch_rejections
            .insert(id.to_string());
        self
    }

    pub fn omit_from_batch(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .batch_omissions
            .insert(id.to_string());
        self
    }

    pub fn fail_batch_call(self, error: BackendError) -> Self {
        self.script.lock().unwrap().batch_failure = Some(error);
        self
    }

    pub fn fail_fetch(self, id: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .fetch_failures
            .insert(id.to_string());
        self
    }

    /// Change the canonical record behind the client's back
    pub fn set_status(&self, id: &str, status: ReportStatus) {
        if let Some(report) = self.reports.lock().unwrap().get_mut(id) {
            report.status = status;
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Submit(_)))
            .count()
    }

    pub fn validate_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Validate(_)))
            .count()
    }

    pub fn batch_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BatchSubmit(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn known(&self, id: &str) -> Result<Report, BackendError> {
        self.reports
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("/reports/{}", id)))
    }

    fn accept(&self, id: &str) -> ValidationResult {
        if let Some(report) = self.reports.lock().unwrap().get_mut(id) {
            report.status = ReportStatus::Submitted;
        }
        ValidationResult::passed().acknowledged(acknowledgment(id))
    }
}

#[async_trait]
impl ReportingBackend for StubBackend {
    async fn list_reports(&self) -> Result<Vec<Report>, BackendError> {
        self.record(Call::List);
        let mut reports: Vec<Report> = self.reports.lock().unwrap().values().cloned().collect();
        reports.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(reports)
    }

    async fn fetch_report(&self, report_id: &str) -> Result<Report, BackendError> {
        self.record(Call::Fetch(report_id.to_string()));
        if self.script.lock().unwrap().fetch_failures.contains(report_id) {
            return Err(BackendError::transport("connection reset"));
        }
        self.known(report_id)
    }

    async fn validate(&self, report_id: &str) -> Result<ValidationResult, BackendError> {
        self.record(Call::Validate(report_id.to_string()));
        let (hang, fail, scripted) = {
            let script = self.script.lock().unwrap();
            (
                script.hanging_validations.contains(report_id),
                script.validation_failures.contains(report_id),
                script.validations.get(report_id).cloned(),
            )
        };
        if hang {
            std::future::pending::<()>().await;
        }
        if fail {
            return Err(BackendError::Status {
                status: 502,
                message: "validation service unavailable".to_string(),
            });
        }
        self.known(report_id)?;
        Ok(scripted.unwrap_or_else(ValidationResult::passed))
    }

    async fn submit(&self, report_id: &str) -> Result<ValidationResult, BackendError> {
        self.record(Call::Submit(report_id.to_string()));
        let (reject, fail) = {
            let script = self.script.lock().unwrap();
            (
                script.submit_rejections.contains(report_id),
                script.submit_failures.contains(report_id),
            )
        };
        if fail {
            return Err(BackendError::transport("connection reset by peer"));
        }
        if reject {
            return Ok(ValidationResult::failed(vec![ValidationFinding::new(
                "submission",
                "DUPLICATE",
                "report already submitted to goAML",
                Severity::Error,
            )]));
        }
        self.known(report_id)?;
        Ok(self.accept(report_id))
    }

    async fn batch_submit(&self, report_ids: &[String]) -> Result<Vec<BatchItemResult>, BackendError> {
        self.record(Call::BatchSubmit(report_ids.to_vec()));
        let (failure, rejections, omissions) = {
            let script = self.script.lock().unwrap();
            (
                script.batch_failure.clone(),
                script.batch_rejections.clone(),
                script.batch_omissions.clone(),
            )
        };
        if let Some(error) = failure {
            return Err(error);
        }

        Ok(report_ids
            .iter()
            .filter(|id| !omissions.contains(*id))
            .map(|id| {
                let result = if rejections.contains(id) {
                    ValidationResult::failed(vec![ValidationFinding::new(
                        "xml",
                        "GOAML-12",
                        "schema violation",
                        Severity::Error,
                    )])
                } else {
                    self.accept(id)
                };
                BatchItemResult {
                    report_id: id.clone(),
                    result,
                }
            })
            .collect())
    }

    async fn update_report(
        &self,
        report_id: &str,
        update: &ReportUpdate,
    ) -> Result<Report, BackendError> {
        self.record(Call::Update(report_id.to_string()));
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .get_mut(report_id)
            .ok_or_else(|| BackendError::NotFound(format!("/reports/{}", report_id)))?;
        if let Some(data) = &update.report_data {
            report.report_data = data.clone();
        }
        if let Some(period) = update.reporting_period {
            report.reporting_period = period;
        }
        Ok(report.clone())
    }

    async fn upload_attachment(
        &self,
        report_id: &str,
        file: AttachmentUpload,
    ) -> Result<AttachmentRef, BackendError> {
        self.record(Call::Upload(report_id.to_string()));
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .get_mut(report_id)
            .ok_or_else(|| BackendError::NotFound(format!("/reports/{}", report_id)))?;
        let attachment = AttachmentRef {
            id: format!("att-{}", report.attachments.len() + 1),
            file_name: file.file_name,
            content_type: file.content_type,
            size: file.bytes.len() as u64,
            uploaded_at: Utc::now(),
        };
        report.attachments.push(attachment.clone());
        Ok(attachment)
    }

    async fn add_comment(&self, report_id: &str, comment: &NewComment) -> Result<(), BackendError> {
        self.record(Call::Comment(report_id.to_string()));
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .get_mut(report_id)
            .ok_or_else(|| BackendError::NotFound(format!("/reports/{}", report_id)))?;
        report.comments.push(Comment {
            id: format!("c{}", report.comments.len() + 1),
            text: comment.text.clone(),
            kind: comment.kind,
            author: comment.author.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn goaml_status(&self) -> Result<GoAmlStatus, BackendError> {
        self.record(Call::Status);
        Ok(GoAmlStatus {
            connected: true,
            last_sync: None,
            message: None,
        })
    }
}

/// Pipeline over `backend` with the store loaded from the backend's reports
pub async fn pipeline(backend: Arc<StubBackend>) -> ReportPipeline {
    let pipeline = ReportPipeline::new(backend.clone(), PipelineConfig::default());
    pipeline.load_reports().await.unwrap();
    pipeline
}
