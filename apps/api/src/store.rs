//! Completed-report hand-off store.
//!
//! The aggregated report is persisted whole under a single logical slot and
//! read back by the presentation side. A new report replaces the previous
//! one; a partially built report never reaches the store.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::analysis::report::AnalysisReport;

/// Persistence seam for completed analysis reports. The in-memory
/// implementation below is the default; a database-backed one slots in
/// behind the same trait.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Replaces the stored report with a newly completed one.
    async fn submit(&self, report: AnalysisReport);

    /// Returns the most recently stored report, if any.
    async fn latest(&self) -> Option<AnalysisReport>;
}

/// Single-slot in-memory store.
#[derive(Default)]
pub struct InMemoryReportStore {
    slot: RwLock<Option<AnalysisReport>>,
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn submit(&self, report: AnalysisReport) {
        *self.slot.write().expect("report slot lock poisoned") = Some(report);
    }

    async fn latest(&self) -> Option<AnalysisReport> {
        self.slot.read().expect("report slot lock poisoned").clone()
    }
}
