//! Request and response shapes specific to the backend boundary.

use chrono::{DateTime, Utc};
use report_core::ValidationResult;
use serde::{Deserialize, Serialize};

/// Body of `POST /reports/batch-submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubmitRequest {
    /// Ids to submit
    pub report_ids: Vec<String>,
}

/// One entry of the batch-submit response, tagged with its originating id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    /// Report the result belongs to
    pub report_id: String,
    /// Per-id submission result
    #[serde(flatten)]
    pub result: ValidationResult,
}

impl BatchItemResult {
    /// Whether the backend accepted this id's submission.
    pub fn is_success(&self) -> bool {
        self.result.success
    }
}

/// A file to upload against a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// File name reported to the backend
    pub file_name: String,
    /// MIME type, when known
    pub content_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Create an upload without a MIME type.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// goAML bridge connectivity (`GET /goaml/status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAmlStatus {
    /// Whether the bridge can currently reach the regulator
    pub connected: bool,
    /// Last successful synchronisation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync: Option<DateTime<Utc>>,
    /// Free-text status from the bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GoAmlStatus {
    /// Whether a sync action may be offered.
    pub fn can_sync(&self) -> bool {
        self.connected
    }
}
