//! Validation findings and results.
//!
//! A [`ValidationResult`] is produced fresh by every validation run and is
//! never mutated afterwards; a newer run for the same report supersedes it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks submission
    Error,
    /// Informational, does not block submission
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            _ => Err(CoreError::UnknownSeverity(s.to_string())),
        }
    }
}

/// A single validation issue reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// Field the finding refers to
    pub field: String,
    /// Stable machine code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Severity
    pub severity: Severity,
    /// How to fix, when the backend suggests something
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ValidationFinding {
    /// Create a finding without a recommendation.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            severity,
            recommendation: None,
        }
    }

    /// Attach a recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// Whether this finding blocks submission.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.code, self.field, self.message
        )
    }
}

/// Regulator acknowledgment returned by an actual submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgment {
    /// Reference assigned by the regulator bridge
    pub reference_id: String,
    /// Time the regulator recorded the submission
    pub submission_date: DateTime<Utc>,
    /// Regulator-side status string
    pub status: String,
    /// Optional free-text message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Outcome of one validation or submission call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Backend's overall verdict
    pub success: bool,
    /// When the result was produced
    #[serde(default = "now")]
    pub timestamp: DateTime<Utc>,
    /// Findings of this run
    #[serde(rename = "validationErrors", default)]
    pub findings: Vec<ValidationFinding>,
    /// Present only after an actual submission call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgment: Option<Acknowledgment>,
}

impl ValidationResult {
    /// Successful run with no findings.
    pub fn passed() -> Self {
        Self {
            success: true,
            timestamp: Utc::now(),
            findings: Vec::new(),
            acknowledgment: None,
        }
    }

    /// Failed run carrying `findings`.
    pub fn failed(findings: Vec<ValidationFinding>) -> Self {
        Self {
            success: false,
            timestamp: Utc::now(),
            findings,
            acknowledgment: None,
        }
    }

    /// Successful run carrying non-blocking `findings`.
    pub fn with_findings(findings: Vec<ValidationFinding>) -> Self {
        Self {
            success: true,
            timestamp: Utc::now(),
            findings,
            acknowledgment: None,
        }
    }

    /// Attach an acknowledgment.
    pub fn acknowledged(mut self, acknowledgment: Acknowledgment) -> Self {
        self.acknowledgment = Some(acknowledgment);
        self
    }

    /// Findings with severity `error`.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.is_blocking())
    }

    /// Findings with severity `warning`.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| !f.is_blocking())
    }

    /// Whether any finding has severity `error`.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
