//! Batch orchestrator.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use report_core::{is_submittable, ValidationResult};
use serde_json::json;
use tracing::{info, warn};

use crate::{AuditEventType, BatchItemOutcome, BatchOutcome, PipelineError, ReportPipeline};

impl ReportPipeline {
    /// Validate a set of reports concurrently and submit the eligible ones in
    /// a single batch call.
    ///
    /// Only ids that passed the gate reach the backend batch-submit call. Ids
    /// the backend accepts are marked submitted; everything else keeps its
    /// status and is reported in the outcome. A failure of the batch call
    /// itself leaves the store untouched and fails the whole operation.
    pub async fn submit_batch<I, S>(&self, report_ids: I) -> Result<BatchOutcome, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: BTreeSet<String> = report_ids.into_iter().map(Into::into).collect();
        let mut outcome = BatchOutcome::default();
        if ids.is_empty() {
            return Ok(outcome);
        }

        info!(size = ids.len(), "Validating batch");
        let validations: Vec<(String, Result<ValidationResult, PipelineError>)> =
            stream::iter(ids)
                .map(|id| async move {
                    let result = self.validate(&id).await;
                    (id, result)
                })
                .buffer_unordered(self.config.max_concurrent_validations.max(1))
                .collect()
                .await;

        let mut passed: HashMap<String, ValidationResult> = HashMap::new();
        for (id, result) in validations {
            match result {
                Ok(validation) if is_submittable(&validation) => {
                    outcome.eligible.insert(id.clone());
                    passed.insert(id, validation);
                }
                Ok(validation) => {
                    outcome
                        .items
                        .insert(id, BatchItemOutcome::Blocked { validation });
                }
                Err(error) => {
                    outcome
                        .items
                        .insert(id, BatchItemOutcome::ValidationFailed { error });
                }
            }
        }

        if outcome.eligible.is_empty() {
            info!(size = outcome.items.len(), "No report in batch passed validation");
            self.audit_batch(&outcome);
            return Ok(outcome);
        }

        let eligible: Vec<String> = outcome.eligible.iter().cloned().collect();
        info!(eligible = eligible.len(), "Submitting batch");
        let responses = self
            .call(self.backend.batch_submit(&eligible))
            .await
            .map_err(|source| {
                warn!(error = %source, "Batch submit call failed");
                self.audit_event(
                    AuditEventType::SubmissionFailed,
                    None,
                    json!({"stage": "batch_submit", "ids": eligible, "error": source.to_string()}),
                );
                PipelineError::BatchSubmission(source)
            })?;

        let mut responses: HashMap<String, ValidationResult> = responses
            .into_iter()
            .filter_map(|item| {
                if passed.contains_key(&item.report_id) {
                    Some((item.report_id, item.result))
                } else {
                    warn!(report_id = %item.report_id, "Ignoring batch result for an id that was not sent");
                    None
                }
            })
            .collect();

        let submitted_at = Utc::now();
        for (id, validation) in passed {
            let item = match responses.remove(&id) {
                Some(submission) if submission.success => {
                    if self
                        .store
                        .mark_submitted(&id, submitted_at, submission.acknowledgment.clone())
                        .is_none()
                    {
                        warn!(report_id = %id, "Submission accepted but report already has a regulator verdict");
                    }
                    outcome.submitted.insert(id.clone());
                    BatchItemOutcome::Submitted {
                        validation,
                        submission,
                    }
                }
                Some(submission) => BatchItemOutcome::Rejected {
                    validation,
                    submission: Some(submission),
                },
                None => {
                    warn!(report_id = %id, "Batch response has no result for id");
                    BatchItemOutcome::Rejected {
                        validation,
                        submission: None,
                    }
                }
            };
            outcome.items.insert(id, item);
        }

        info!(
            selected = outcome.items.len(),
            eligible = outcome.eligible.len(),
            submitted = outcome.submitted.len(),
            "Batch completed"
        );
        self.audit_batch(&outcome);
        Ok(outcome)
    }

    fn audit_batch(&self, outcome: &BatchOutcome) {
        for id in &outcome.submitted {
            self.audit_event(AuditEventType::Submitted, Some(id), json!({"batch": true}));
        }
        self.audit_event(
            AuditEventType::BatchSubmitted,
            None,
            json!({
                "selected": outcome.items.keys().collect::<Vec<_>>(),
                "eligible": outcome.eligible,
                "submitted": outcome.submitted,
            }),
        );
    }
}
