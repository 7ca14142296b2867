//! Regulatory report records and their lifecycle.
//!
//! A [`Report`] is the client's view of a regulator submission record
//! (STR, CTR, EFT, KYC or PERIODIC). The backend owns the canonical copy;
//! the client only ever replaces whole records.
//!
//! # Examples
//!
//! ```
//! use report_core::types::{ReportStatus, ReportType};
//!
//! let ty: ReportType = "str".parse().unwrap();
//! assert_eq!(ty, ReportType::Str);
//! assert_eq!(ty.code(), "STR");
//!
//! assert!(ReportStatus::Draft.is_pre_submission());
//! assert!(ReportStatus::Draft.can_advance_to(ReportStatus::Submitted));
//! assert!(!ReportStatus::Accepted.can_advance_to(ReportStatus::Draft));
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CoreError;
use super::validation::Acknowledgment;

/// Regulator report categories handled by the goAML bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportType {
    /// Suspicious Transaction Report
    Str,
    /// Cash Transaction Report
    Ctr,
    /// Electronic Funds Transfer report
    Eft,
    /// Know-Your-Customer report
    Kyc,
    /// Periodic compliance report
    Periodic,
}

impl ReportType {
    /// Upper-case code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ReportType::Str => "STR",
            ReportType::Ctr => "CTR",
            ReportType::Eft => "EFT",
            ReportType::Kyc => "KYC",
            ReportType::Periodic => "PERIODIC",
        }
    }

    /// All report types in declaration order.
    pub fn all() -> [ReportType; 5] {
        [
            ReportType::Str,
            ReportType::Ctr,
            ReportType::Eft,
            ReportType::Kyc,
            ReportType::Periodic,
        ]
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for ReportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STR" => Ok(ReportType::Str),
            "CTR" => Ok(ReportType::Ctr),
            "EFT" => Ok(ReportType::Eft),
            "KYC" => Ok(ReportType::Kyc),
            "PERIODIC" => Ok(ReportType::Periodic),
            _ => Err(CoreError::UnknownReportType(s.to_string())),
        }
    }
}

/// Report lifecycle status.
///
/// Status only advances: `draft -> pending_approval/submitted -> accepted/rejected`.
/// The pipeline itself only records the transition into `submitted`; approval,
/// acceptance and rejection are asserted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Being prepared
    Draft,
    /// Awaiting internal sign-off
    PendingApproval,
    /// Sent to the regulator
    Submitted,
    /// Acknowledged and accepted by the regulator
    Accepted,
    /// Rejected by the regulator
    Rejected,
}

impl ReportStatus {
    /// Position in the lifecycle; accepted and rejected share the final stage.
    fn stage(&self) -> u8 {
        match self {
            ReportStatus::Draft => 0,
            ReportStatus::PendingApproval => 1,
            ReportStatus::Submitted => 2,
            ReportStatus::Accepted | ReportStatus::Rejected => 3,
        }
    }

    /// Whether the report has not yet been sent to the regulator.
    pub fn is_pre_submission(&self) -> bool {
        self.stage() < ReportStatus::Submitted.stage()
    }

    /// Whether the regulator has reached a verdict.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Accepted | ReportStatus::Rejected)
    }

    /// Whether moving from `self` to `next` keeps the lifecycle monotonic.
    pub fn can_advance_to(&self, next: ReportStatus) -> bool {
        next.stage() > self.stage()
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::PendingApproval => "pending_approval",
            ReportStatus::Submitted => "submitted",
            ReportStatus::Accepted => "accepted",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(ReportStatus::Draft),
            "pending_approval" => Ok(ReportStatus::PendingApproval),
            "submitted" => Ok(ReportStatus::Submitted),
            "accepted" => Ok(ReportStatus::Accepted),
            "rejected" => Ok(ReportStatus::Rejected),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

/// Reporting period covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Inclusive end
    pub end: DateTime<Utc>,
}

/// Audience of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// Visible to the compliance team only
    Internal,
    /// Exchanged with the regulator
    Regulatory,
}

impl FromStr for CommentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "internal" => Ok(CommentKind::Internal),
            "regulatory" => Ok(CommentKind::Regulatory),
            _ => Err(CoreError::UnknownCommentKind(s.to_string())),
        }
    }
}

/// A comment as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Backend-assigned identifier
    pub id: String,
    /// Comment body
    pub text: String,
    /// Audience
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Author, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// A comment to be added to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Comment body
    pub text: String,
    /// Audience
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Author, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl NewComment {
    /// Internal comment without an author.
    pub fn internal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::Internal,
            author: None,
        }
    }

    /// Regulatory comment without an author.
    pub fn regulatory(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::Regulatory,
            author: None,
        }
    }

    /// Attach an author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Reference to a file stored by the backend against a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    /// Backend-assigned identifier
    pub id: String,
    /// Original file name
    pub file_name: String,
    /// MIME type, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// Editable fields of a pre-submission report (`PATCH /reports/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUpdate {
    /// Replacement payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_data: Option<serde_json::Value>,
    /// Replacement reporting period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_period: Option<ReportingPeriod>,
}

impl ReportUpdate {
    /// Whether the update carries no change.
    pub fn is_empty(&self) -> bool {
        self.report_data.is_none() && self.reporting_period.is_none()
    }
}

/// A regulatory report record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report identifier
    pub id: String,
    /// Report category
    pub report_type: ReportType,
    /// Lifecycle status
    pub status: ReportStatus,
    /// Reporting period
    pub reporting_period: ReportingPeriod,
    /// Report payload, opaque to the pipeline
    #[serde(default)]
    pub report_data: serde_json::Value,
    /// Reference assigned by the regulator bridge once synchronised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    /// Time of the last successful submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Acknowledgment returned with the last successful submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledgment: Option<Acknowledgment>,
    /// Comments in creation order
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Attached files
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl Report {
    /// Create a draft report with an empty payload.
    pub fn draft(id: impl Into<String>, report_type: ReportType, period: ReportingPeriod) -> Self {
        Self {
            id: id.into(),
            report_type,
            status: ReportStatus::Draft,
            reporting_period: period,
            report_data: serde_json::Value::Null,
            external_reference: None,
            submitted_at: None,
            acknowledgment: None,
            comments: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Set the payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.report_data = data;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    /// The record that results from a successful submission at `at`.
    ///
    /// Pre-submission reports become `submitted`; an already submitted report
    /// keeps its status and gets the new submission metadata. Returns `None`
    /// once the regulator has reached a verdict, since nothing may be recorded
    /// over accepted or rejected reports.
    pub fn submitted(&self, at: DateTime<Utc>, acknowledgment: Option<Acknowledgment>) -> Option<Self> {
        if self.status.is_terminal() {
            return None;
        }
        let mut next = self.clone();
        next.status = ReportStatus::Submitted;
        next.submitted_at = Some(at);
        if acknowledgment.is_some() {
            next.acknowledgment = acknowledgment;
        }
        Some(next)
    }
}
