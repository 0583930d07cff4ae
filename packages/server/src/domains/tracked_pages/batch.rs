//! Batch runner: applies the change detector to many pages.
//!
//! Each page runs detect → persist as one unit. Pages run concurrently up to
//! a fixed bound, and whatever happens to one page (fetch failure, store
//! failure, even a panic) is reported against that page alone.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::common::{StoreError, StoreResult, TrackedPageId};
use crate::domains::tracked_pages::detector::{ChangeDetector, DetectionOutcome};
use crate::domains::tracked_pages::models::TrackedPage;
use crate::domains::tracked_pages::store::TrackedPageStore;

pub const DEFAULT_CHECK_CONCURRENCY: usize = 4;

/// A page's check could not be completed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to persist check result: {0}")]
    Persistence(#[from] StoreError),

    #[error("check aborted: {0}")]
    Panicked(String),
}

impl RunError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Persistence(e) if e.is_not_found())
    }
}

/// Outcome of one page together with its record as persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedPage {
    pub outcome: DetectionOutcome,
    pub page: TrackedPage,
}

#[derive(Debug)]
pub struct PageCheckReport {
    pub page_id: TrackedPageId,
    pub result: Result<CheckedPage, RunError>,
}

/// Per-status counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub checked: usize,
    pub baseline: usize,
    pub unchanged: usize,
    pub changed: usize,
    /// Pages whose fetch or extraction failed (state preserved).
    pub failed: usize,
    /// Pages whose result could not be recorded at all.
    pub errored: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[PageCheckReport]) -> Self {
        let mut summary = Self {
            checked: reports.len(),
            ..Default::default()
        };
        for report in reports {
            match &report.result {
                Ok(checked) => match checked.outcome {
                    DetectionOutcome::Baseline { .. } => summary.baseline += 1,
                    DetectionOutcome::Unchanged { .. } => summary.unchanged += 1,
                    DetectionOutcome::Changed { .. } => summary.changed += 1,
                    DetectionOutcome::Failed { .. } => summary.failed += 1,
                },
                Err(_) => summary.errored += 1,
            }
        }
        summary
    }
}

pub struct BatchRunner {
    detector: Arc<ChangeDetector>,
    store: Arc<dyn TrackedPageStore>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(
        detector: Arc<ChangeDetector>,
        store: Arc<dyn TrackedPageStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            detector,
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Detect and persist a single page.
    pub async fn check_page(&self, page: TrackedPage) -> Result<CheckedPage, RunError> {
        let detection = self.detector.detect(&page).await;
        let page = self.store.update_page(page.id, &detection.patch).await?;
        Ok(CheckedPage {
            outcome: detection.outcome,
            page,
        })
    }

    /// Load and check one page by id. A missing page is `NotFound`.
    pub async fn check_one(&self, id: TrackedPageId) -> Result<CheckedPage, RunError> {
        let page = self.store.find_page(id).await?;
        self.check_page(page).await
    }

    /// Check every given page, one report per page. Completion order is
    /// unspecified.
    pub async fn run_all(&self, pages: Vec<TrackedPage>) -> Vec<PageCheckReport> {
        let reports: Vec<PageCheckReport> = stream::iter(pages)
            .map(|page| async move {
                let page_id = page.id;
                let result = match AssertUnwindSafe(self.check_page(page)).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => Err(RunError::Panicked(panic_message(&*panic))),
                };
                if let Err(e) = &result {
                    error!(page_id = %page_id, error = %e, "Page check not recorded");
                }
                PageCheckReport { page_id, result }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let summary = BatchSummary::from_reports(&reports);
        info!(
            checked = summary.checked,
            baseline = summary.baseline,
            unchanged = summary.unchanged,
            changed = summary.changed,
            failed = summary.failed,
            errored = summary.errored,
            "Batch check complete"
        );
        reports
    }

    /// Check every stored page.
    pub async fn run_stored(&self) -> StoreResult<Vec<PageCheckReport>> {
        let pages = self.store.list_pages().await?;
        Ok(self.run_all(pages).await)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic while checking page".to_string()
    }
}
