//! Audit trail of pipeline actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Audit event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Validation completed
    Validated,
    /// Gate refused submission
    SubmissionBlocked,
    /// Report submitted
    Submitted,
    /// Backend refused the submission
    SubmissionRejected,
    /// Validation or submission call failed
    SubmissionFailed,
    /// Batch submission completed
    BatchSubmitted,
    /// Report fields updated
    ReportUpdated,
    /// Comment added
    CommentAdded,
    /// Attachment uploaded
    AttachmentUploaded,
}

/// Audit event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event ID
    pub event_id: String,
    /// Event type
    pub event_type: AuditEventType,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// User or system ID
    pub actor: String,
    /// Report the event concerns; `None` for batch-level events
    pub report_id: Option<String>,
    /// Event details
    pub details: serde_json::Value,
}

/// Bounded in-memory audit trail
pub struct AuditLog {
    events: RwLock<VecDeque<AuditEvent>>,
    max_events: usize,
    counter: AtomicU64,
}

impl AuditLog {
    /// Create a new audit log
    pub fn new() -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(1024)),
            max_events: 10_000,
            counter: AtomicU64::new(0),
        }
    }

    /// Set maximum events to retain
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max.max(1);
        self
    }

    /// Record an audit event and return its id
    pub fn record(
        &self,
        event_type: AuditEventType,
        actor: &str,
        report_id: Option<&str>,
        details: serde_json::Value,
    ) -> String {
        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let event_id = format!("AUD-{:012}", seq);

        let event = AuditEvent {
            event_id: event_id.clone(),
            event_type,
            timestamp: Utc::now(),
            actor: actor.to_string(),
            report_id: report_id.map(str::to_string),
            details,
        };

        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
        event_id
    }

    /// Events for one report, oldest first
    pub fn events_for(&self, report_id: &str) -> Vec<AuditEvent> {
        self.filtered(|e| e.report_id.as_deref() == Some(report_id))
    }

    /// Events of one type, oldest first
    pub fn events_by_type(&self, event_type: AuditEventType) -> Vec<AuditEvent> {
        self.filtered(|e| e.event_type == event_type)
    }

    /// Most recent events, newest first
    pub fn recent(&self, count: usize) -> Vec<AuditEvent> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.iter().rev().take(count).cloned().collect()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no events are retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered(&self, keep: impl Fn(&AuditEvent) -> bool) -> Vec<AuditEvent> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        events.iter().filter(|e| keep(e)).cloned().collect()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
