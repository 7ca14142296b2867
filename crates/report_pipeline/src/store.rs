//! Client-side report cache.
//!
//! Records are stored as whole values and only ever replaced whole, under a
//! single write lock. A reader therefore sees either the record before a
//! submission or the record after it, never a status without its timestamp.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use report_core::{Acknowledgment, Report, ReportStatus};

/// Report counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    /// Total reports
    pub total: usize,
    /// Draft reports
    pub draft: usize,
    /// Reports awaiting approval
    pub pending_approval: usize,
    /// Submitted reports
    pub submitted: usize,
    /// Accepted reports
    pub accepted: usize,
    /// Rejected reports
    pub rejected: usize,
}

/// In-memory report store keyed by report id
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: RwLock<HashMap<String, Report>>,
}

impl ReportStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `reports`
    pub fn with_reports(reports: impl IntoIterator<Item = Report>) -> Self {
        let store = Self::new();
        store.replace_all(reports);
        store
    }

    // Every write replaces whole records, so a poisoned lock still guards
    // consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Report>> {
        self.reports.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Report>> {
        self.reports.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a report by id
    pub fn get(&self, report_id: &str) -> Option<Report> {
        self.read().get(report_id).cloned()
    }

    /// Whether the store knows `report_id`
    pub fn contains(&self, report_id: &str) -> bool {
        self.read().contains_key(report_id)
    }

    /// Status of a report, if known
    pub fn status(&self, report_id: &str) -> Option<ReportStatus> {
        self.read().get(report_id).map(|r| r.status)
    }

    /// All reports sorted by id
    pub fn list(&self) -> Vec<Report> {
        let mut reports: Vec<Report> = self.read().values().cloned().collect();
        reports.sort_by(|a, b| a.id.cmp(&b.id));
        reports
    }

    /// Reports in `status`, sorted by id
    pub fn by_status(&self, status: ReportStatus) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .read()
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.id.cmp(&b.id));
        reports
    }

    /// Number of reports
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Insert or replace a record, returning the previous one
    pub fn upsert(&self, report: Report) -> Option<Report> {
        self.write().insert(report.id.clone(), report)
    }

    /// Replace the whole contents of the store
    pub fn replace_all(&self, reports: impl IntoIterator<Item = Report>) {
        let fresh: HashMap<String, Report> = reports.into_iter().map(|r| (r.id.clone(), r)).collect();
        *self.write() = fresh;
    }

    /// Remove a record
    pub fn remove(&self, report_id: &str) -> Option<Report> {
        self.write().remove(report_id)
    }

    /// Record a successful submission of `report_id` at `at`.
    ///
    /// Status and submission metadata change together in one replacement.
    /// Returns the new record, or `None` when the id is unknown or the report
    /// already has a regulator verdict (status never regresses).
    pub fn mark_submitted(
        &self,
        report_id: &str,
        at: DateTime<Utc>,
        acknowledgment: Option<Acknowledgment>,
    ) -> Option<Report> {
        let mut reports = self.write();
        let next = reports.get(report_id)?.submitted(at, acknowledgment)?;
        reports.insert(report_id.to_string(), next.clone());
        Some(next)
    }

    /// Report counts per status
    pub fn statistics(&self) -> StoreStatistics {
        let reports = self.read();
        let mut stats = StoreStatistics {
            total: reports.len(),
            ..Default::default()
        };
        for report in reports.values() {
            match report.status {
                ReportStatus::Draft => stats.draft += 1,
                ReportStatus::PendingApproval => stats.pending_approval += 1,
                ReportStatus::Submitted => stats.submitted += 1,
                ReportStatus::Accepted => stats.accepted += 1,
                ReportStatus::Rejected => stats.rejected += 1,
            }
        }
        stats
    }
}
