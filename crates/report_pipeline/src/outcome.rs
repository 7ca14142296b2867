//! Results of single and batch submissions.
//!
//! Every path through the pipeline ends in one of these values; a blocked or
//! failed report is data for the caller, not an exception.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use report_core::{ValidationFinding, ValidationResult};

use crate::error::PipelineError;

/// Outcome of [`ReportPipeline::submit_one`](crate::ReportPipeline::submit_one)
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Validation passed and the backend accepted the submission
    Submitted {
        /// Report id
        report_id: String,
        /// Validation that opened the gate
        validation: ValidationResult,
        /// Backend submit response, carrying the acknowledgment
        submission: ValidationResult,
        /// Time recorded in the store
        submitted_at: DateTime<Utc>,
    },
    /// Validation produced blocking findings; nothing was sent
    Blocked {
        /// Report id
        report_id: String,
        /// Validation that closed the gate
        validation: ValidationResult,
    },
    /// Validation passed but the backend answered the submit call unsuccessfully
    Rejected {
        /// Report id
        report_id: String,
        /// Validation that opened the gate
        validation: ValidationResult,
        /// Backend submit response
        submission: ValidationResult,
    },
    /// The validation or submit call failed; store untouched
    Failed {
        /// Report id
        report_id: String,
        /// Validation, when that step completed
        validation: Option<ValidationResult>,
        /// What went wrong
        error: PipelineError,
    },
}

impl SubmissionOutcome {
    /// Report id
    pub fn report_id(&self) -> &str {
        match self {
            Self::Submitted { report_id, .. }
            | Self::Blocked { report_id, .. }
            | Self::Rejected { report_id, .. }
            | Self::Failed { report_id, .. } => report_id,
        }
    }

    /// Whether the report was submitted
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// Validation result, when validation completed
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Submitted { validation, .. }
            | Self::Blocked { validation, .. }
            | Self::Rejected { validation, .. } => Some(validation),
            Self::Failed { validation, .. } => validation.as_ref(),
        }
    }

    /// Findings to surface: the backend's on rejection, the validation's otherwise
    pub fn findings(&self) -> &[ValidationFinding] {
        match self {
            Self::Rejected { submission, .. } => &submission.findings,
            _ => self.validation().map(|v| v.findings.as_slice()).unwrap_or(&[]),
        }
    }

    /// One-line summary for display
    pub fn summary(&self) -> String {
        match self {
            Self::Submitted { report_id, submission, .. } => match &submission.acknowledgment {
                Some(ack) => format!("{}: submitted (reference {})", report_id, ack.reference_id),
                None => format!("{}: submitted", report_id),
            },
            Self::Blocked { report_id, validation } => format!(
                "{}: blocked by {} validation error(s)",
                report_id,
                validation.errors().count()
            ),
            Self::Rejected { report_id, .. } => {
                format!("{}: rejected by backend", report_id)
            }
            Self::Failed { report_id, error, .. } => format!("{}: failed: {}", report_id, error),
        }
    }
}

/// Terminal state of one id within a batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItemOutcome {
    /// The validation call failed; the id was not eligible
    ValidationFailed {
        /// What went wrong
        error: PipelineError,
    },
    /// Validation produced blocking findings; the id was not sent
    Blocked {
        /// Validation that closed the gate
        validation: ValidationResult,
    },
    /// Sent and accepted
    Submitted {
        /// Validation that opened the gate
        validation: ValidationResult,
        /// Per-id batch response
        submission: ValidationResult,
    },
    /// Sent and refused, or missing from the batch response
    Rejected {
        /// Validation that opened the gate
        validation: ValidationResult,
        /// Per-id batch response; `None` when the backend returned nothing for the id
        submission: Option<ValidationResult>,
    },
}

impl BatchItemOutcome {
    /// Whether the id was submitted
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// Findings to surface for this id
    pub fn findings(&self) -> &[ValidationFinding] {
        match self {
            Self::ValidationFailed { .. } => &[],
            Self::Blocked { validation } => &validation.findings,
            Self::Submitted { submission, .. } => &submission.findings,
            Self::Rejected {
                submission: Some(submission),
                ..
            } => &submission.findings,
            Self::Rejected { validation, .. } => &validation.findings,
        }
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "validation failed",
            Self::Blocked { .. } => "blocked",
            Self::Submitted { .. } => "submitted",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// Aggregated result of [`ReportPipeline::submit_batch`](crate::ReportPipeline::submit_batch)
///
/// Every input id has an entry in `items`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Outcome per input id
    pub items: BTreeMap<String, BatchItemOutcome>,
    /// Ids that passed the gate and were sent to the backend
    pub eligible: BTreeSet<String>,
    /// Ids the backend accepted
    pub submitted: BTreeSet<String>,
}

impl BatchOutcome {
    /// Outcome for one id
    pub fn get(&self, report_id: &str) -> Option<&BatchItemOutcome> {
        self.items.get(report_id)
    }

    /// Number of input ids
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch had no ids
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids that were not submitted, in id order
    pub fn unsubmitted(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|(_, item)| !item.is_submitted())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Whether every input id was submitted
    pub fn all_submitted(&self) -> bool {
        !self.items.is_empty() && self.submitted.len() == self.items.len()
    }

    /// One-line summary for display
    pub fn summary(&self) -> String {
        format!(
            "{} selected, {} eligible, {} submitted",
            self.items.len(),
            self.eligible.len(),
            self.submitted.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_backend::BackendError;
    use report_core::{Acknowledgment, Severity};

    fn blocking() -> ValidationResult {
        ValidationResult::failed(vec![ValidationFinding::new(
            "amount",
            "E01",
            "missing",
            Severity::Error,
        )])
    }

    #[test]
    fn test_submission_outcome_summary() {
        let ack = Acknowledgment {
            reference_id: "CBUAE-7".to_string(),
            submission_date: Utc::now(),
            status: "RECEIVED".to_string(),
            message: None,
        };
        let outcome = SubmissionOutcome::Submitted {
            report_id: "r1".to_string(),
            validation: ValidationResult::passed(),
            submission: ValidationResult::passed().acknowledged(ack),
            submitted_at: Utc::now(),
        };
        assert!(outcome.is_submitted());
        assert_eq!(outcome.summary(), "r1: submitted (reference CBUAE-7)");

        let outcome = SubmissionOutcome::Blocked {
            report_id: "r2".to_string(),
            validation: blocking(),
        };
        assert_eq!(outcome.summary(), "r2: blocked by 1 validation error(s)");
        assert_eq!(outcome.findings().len(), 1);
    }

    #[test]
    fn test_failed_outcome_has_no_findings() {
        let outcome = SubmissionOutcome::Failed {
            report_id: "r3".to_string(),
            validation: None,
            error: PipelineError::Validation {
                report_id: "r3".to_string(),
                source: BackendError::transport("reset"),
            },
        };
        assert!(outcome.validation().is_none());
        assert!(outcome.findings().is_empty());
        assert!(outcome.summary().starts_with("r3: failed"));
    }

    #[test]
    fn test_batch_outcome_accounting() {
        let mut outcome = BatchOutcome::default();
        outcome.items.insert(
            "a".to_string(),
            BatchItemOutcome::Blocked { validation: blocking() },
        );
        outcome.items.insert(
            "b".to_string(),
            BatchItemOutcome::Submitted {
                validation: ValidationResult::passed(),
                submission: ValidationResult::passed(),
            },
        );
        outcome.eligible.insert("b".to_string());
        outcome.submitted.insert("b".to_string());

        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.unsubmitted(), ["a"]);
        assert!(!outcome.all_submitted());
        assert_eq!(outcome.get("a").unwrap().label(), "blocked");
        assert_eq!(outcome.summary(), "2 selected, 1 eligible, 1 submitted");
    }

    #[test]
    fn test_rejected_without_response_surfaces_validation_findings() {
        let warning = ValidationFinding::new("narrative", "W03", "short", Severity::Warning);
        let item = BatchItemOutcome::Rejected {
            validation: ValidationResult::with_findings(vec![warning.clone()]),
            submission: None,
        };
        assert_eq!(item.findings(), [warning]);
    }
}
