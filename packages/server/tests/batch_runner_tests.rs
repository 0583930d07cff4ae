//! Batch runner: one report per page, failure isolation and the
//! concurrency bound.

mod common;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{html_page, new_page, TestHarness};
use server_core::common::{StoreError, StoreResult, TrackedPageId};
use server_core::domains::tracked_pages::{
    actions, BatchRunner, BatchSummary, ChangeDetector, DetectionOutcome, Fingerprint, RunError,
    TrackedPage, TrackedPagePatch, TrackedPageStore,
};
use server_core::kernel::{
    BasePageFetcher, FetchError, FetchResult, FetchedPage, MemoryStore, MockPageFetcher,
};

fn url(i: usize) -> String {
    format!("https://example.org/page-{}", i)
}

/// Store that refuses to record results for one page.
struct FlakyStore {
    inner: Arc<MemoryStore>,
    broken: TrackedPageId,
}

#[async_trait]
impl TrackedPageStore for FlakyStore {
    async fn list_pages(&self) -> StoreResult<Vec<TrackedPage>> {
        self.inner.list_pages().await
    }

    async fn find_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        self.inner.find_page(id).await
    }

    async fn insert_page(&self, page: TrackedPage) -> StoreResult<TrackedPage> {
        self.inner.insert_page(page).await
    }

    async fn update_page(
        &self,
        id: TrackedPageId,
        patch: &TrackedPagePatch,
    ) -> StoreResult<TrackedPage> {
        if id == self.broken {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.update_page(id, patch).await
    }

    async fn delete_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        self.inner.delete_page(id).await
    }
}

/// Fetcher that panics on one URL and serves a fixed page otherwise.
struct PanickyFetcher {
    poisoned: String,
}

#[async_trait]
impl BasePageFetcher for PanickyFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        if url == self.poisoned {
            panic!("parser blew up on {}", url);
        }
        Ok(FetchedPage::html(html_page("steady")))
    }
}

/// Fetcher that records how many fetches overlap.
#[derive(Default)]
struct CountingFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl BasePageFetcher for CountingFetcher {
    async fn fetch(&self, _url: &str) -> FetchResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(FetchedPage::html(html_page("busy")))
    }
}

#[tokio::test]
async fn one_failing_page_does_not_affect_the_rest() {
    // Every page is stable except page 2, which goes down, and page 4,
    // which gets edited.
    let mut fetcher = MockPageFetcher::new();
    for i in 0..5 {
        fetcher = fetcher.with_page(&url(i), &html_page(&format!("page {}", i)));
    }
    let fetcher = fetcher
        .with_failure(
            &url(2),
            FetchError::Unreachable {
                url: url(2),
                reason: "connection refused".to_string(),
            },
        )
        .with_page(&url(4), &html_page("page 4, edited"));
    let h = TestHarness::new(fetcher);
    let mut pages = Vec::new();
    for i in 0..5 {
        pages.push(h.track(&url(i)).await);
    }

    let first = h.deps.runner.run_stored().await.unwrap();
    assert_eq!(BatchSummary::from_reports(&first).baseline, 5);
    let broken = pages[2].clone();
    let before = h.store.find_page(broken.id).await.unwrap();

    let reports = h.deps.runner.run_stored().await.unwrap();

    assert_eq!(reports.len(), 5);
    let ids: HashSet<_> = reports.iter().map(|r| r.page_id).collect();
    assert_eq!(ids, pages.iter().map(|p| p.id).collect::<HashSet<_>>());

    for report in &reports {
        let checked = report.result.as_ref().unwrap();
        if report.page_id == broken.id {
            assert!(checked.outcome.is_failure());
            assert_eq!(checked.page.fingerprint, before.fingerprint);
            assert_eq!(checked.page.changed, before.changed);
        } else if report.page_id == pages[4].id {
            assert!(matches!(checked.outcome, DetectionOutcome::Changed { .. }));
            assert!(checked.page.changed);
        } else {
            assert!(matches!(checked.outcome, DetectionOutcome::Unchanged { .. }));
        }
    }

    assert_eq!(
        BatchSummary::from_reports(&reports),
        BatchSummary {
            checked: 5,
            baseline: 0,
            unchanged: 3,
            changed: 1,
            failed: 1,
            errored: 0,
        }
    );
}

#[tokio::test]
async fn persistence_failure_is_reported_per_page() {
    let memory = Arc::new(MemoryStore::new());
    let mut fetcher = MockPageFetcher::new();
    let mut pages = Vec::new();
    for i in 0..3 {
        fetcher = fetcher.with_page(&url(i), &html_page("same"));
        let page = actions::create_tracked_page(new_page(&url(i)), memory.as_ref())
            .await
            .unwrap();
        pages.push(page);
    }
    let store = Arc::new(FlakyStore {
        inner: memory.clone(),
        broken: pages[1].id,
    });
    let detector = Arc::new(ChangeDetector::new(Arc::new(fetcher)));
    let runner = BatchRunner::new(detector, store, 2);

    let reports = runner.run_stored().await.unwrap();

    assert_eq!(reports.len(), 3);
    for report in &reports {
        if report.page_id == pages[1].id {
            assert!(matches!(report.result, Err(RunError::Persistence(_))));
        } else {
            let checked = report.result.as_ref().unwrap();
            assert_eq!(checked.page.fingerprint, Some(Fingerprint::of_text("same")));
        }
    }

    // The page whose write failed keeps its original state.
    let untouched = memory.find_page(pages[1].id).await.unwrap();
    assert!(untouched.fingerprint.is_none());
    assert!(untouched.last_checked_at.is_none());
    assert_eq!(BatchSummary::from_reports(&reports).errored, 1);
}

#[tokio::test]
async fn panic_in_one_check_is_contained() {
    let h = TestHarness::with_fetcher(Arc::new(PanickyFetcher {
        poisoned: url(1),
    }));
    for i in 0..3 {
        h.track(&url(i)).await;
    }

    let reports = h.deps.runner.run_stored().await.unwrap();

    assert_eq!(reports.len(), 3);
    let panicked: Vec<_> = reports
        .iter()
        .filter(|r| matches!(r.result, Err(RunError::Panicked(_))))
        .collect();
    assert_eq!(panicked.len(), 1);
    match &panicked[0].result {
        Err(RunError::Panicked(msg)) => assert!(msg.contains("parser blew up")),
        _ => unreachable!(),
    }
    assert_eq!(BatchSummary::from_reports(&reports).baseline, 2);
}

#[tokio::test]
async fn concurrency_is_bounded() {
    let fetcher = Arc::new(CountingFetcher::default());
    let store = Arc::new(MemoryStore::new());
    for i in 0..12 {
        actions::create_tracked_page(new_page(&url(i)), store.as_ref())
            .await
            .unwrap();
    }
    let detector = Arc::new(ChangeDetector::new(fetcher.clone()));
    let runner = BatchRunner::new(detector, store, 3);

    let reports = runner.run_stored().await.unwrap();

    assert_eq!(reports.len(), 12);
    let peak = fetcher.peak.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency {} exceeded bound", peak);
    assert!(peak > 1, "checks never overlapped");
}

#[tokio::test]
async fn zero_concurrency_is_treated_as_one() {
    let fetcher = Arc::new(CountingFetcher::default());
    let store = Arc::new(MemoryStore::new());
    for i in 0..3 {
        actions::create_tracked_page(new_page(&url(i)), store.as_ref())
            .await
            .unwrap();
    }
    let detector = Arc::new(ChangeDetector::new(fetcher.clone()));
    let runner = BatchRunner::new(detector, store, 0);

    let reports = runner.run_stored().await.unwrap();

    assert_eq!(reports.len(), 3);
    assert_eq!(fetcher.peak.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_batch_produces_no_reports() {
    let h = TestHarness::new(MockPageFetcher::new());

    let reports = h.deps.runner.run_stored().await.unwrap();

    assert!(reports.is_empty());
    assert_eq!(BatchSummary::from_reports(&reports), BatchSummary::default());
}
