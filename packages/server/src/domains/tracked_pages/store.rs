use async_trait::async_trait;

use crate::common::{StoreResult, TrackedPageId};
use crate::domains::tracked_pages::models::{TrackedPage, TrackedPagePatch};

/// Record store for tracked pages.
///
/// Implementations give at least last-writer-wins semantics per record and
/// apply each [`TrackedPagePatch`] atomically.
#[async_trait]
pub trait TrackedPageStore: Send + Sync {
    /// All tracked pages, oldest first.
    async fn list_pages(&self) -> StoreResult<Vec<TrackedPage>>;

    async fn find_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage>;

    async fn insert_page(&self, page: TrackedPage) -> StoreResult<TrackedPage>;

    async fn update_page(
        &self,
        id: TrackedPageId,
        patch: &TrackedPagePatch,
    ) -> StoreResult<TrackedPage>;

    /// Remove a page, returning the removed record.
    async fn delete_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage>;
}
