//! Server dependencies (using traits for testability)
//!
//! The central container handed to route handlers. Every external
//! collaborator sits behind a trait so tests can swap in memory stores and
//! scripted fetchers.

use std::sync::Arc;

use crate::domains::tasks::TaskStore;
use crate::domains::tracked_pages::{BatchRunner, ChangeDetector, TrackedPageStore};
use crate::kernel::BasePageFetcher;

#[derive(Clone)]
pub struct ServerDeps {
    pub pages: Arc<dyn TrackedPageStore>,
    pub tasks: Arc<dyn TaskStore>,
    /// Change detector + batch runner wired to the fetcher and `pages`.
    pub runner: Arc<BatchRunner>,
}

impl ServerDeps {
    pub fn new(
        pages: Arc<dyn TrackedPageStore>,
        tasks: Arc<dyn TaskStore>,
        fetcher: Arc<dyn BasePageFetcher>,
        check_concurrency: usize,
    ) -> Self {
        let detector = Arc::new(ChangeDetector::new(fetcher));
        let runner = Arc::new(BatchRunner::new(detector, pages.clone(), check_concurrency));
        Self {
            pages,
            tasks,
            runner,
        }
    }
}
