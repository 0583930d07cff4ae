//! Operations behind the tracked-page endpoints.

use tracing::info;
use url::Url;

use crate::common::{ActionError, ActionResult, TrackedPageId};
use crate::domains::tracked_pages::batch::{BatchRunner, CheckedPage, PageCheckReport, RunError};
use crate::domains::tracked_pages::models::{NewTrackedPage, TrackedPage, TrackedPagePatch};
use crate::domains::tracked_pages::store::TrackedPageStore;

impl From<RunError> for ActionError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Persistence(e) => ActionError::Store(e),
            RunError::Panicked(msg) => ActionError::Internal(msg),
        }
    }
}

fn validate(input: NewTrackedPage) -> ActionResult<NewTrackedPage> {
    let url = input.url.trim();
    if url.is_empty() {
        return Err(ActionError::validation("url is required"));
    }

    let parsed =
        Url::parse(url).map_err(|e| ActionError::validation(format!("invalid url '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ActionError::validation(format!(
            "url must be http or https, got '{}'",
            parsed.scheme()
        )));
    }

    Ok(NewTrackedPage {
        url: url.to_string(),
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
    })
}

/// Start tracking a page. Detection state starts empty.
pub async fn create_tracked_page(
    input: NewTrackedPage,
    store: &dyn TrackedPageStore,
) -> ActionResult<TrackedPage> {
    let input = validate(input)?;
    let page = store.insert_page(TrackedPage::new(input)).await?;
    info!(page_id = %page.id, url = %page.url, "Tracking new page");
    Ok(page)
}

pub async fn list_tracked_pages(store: &dyn TrackedPageStore) -> ActionResult<Vec<TrackedPage>> {
    Ok(store.list_pages().await?)
}

pub async fn delete_tracked_page(
    id: TrackedPageId,
    store: &dyn TrackedPageStore,
) -> ActionResult<TrackedPage> {
    let page = store.delete_page(id).await?;
    info!(page_id = %id, "Stopped tracking page");
    Ok(page)
}

/// Mark a page's change as seen. Fingerprint and check time are untouched.
pub async fn acknowledge_tracked_page(
    id: TrackedPageId,
    store: &dyn TrackedPageStore,
) -> ActionResult<TrackedPage> {
    Ok(store.update_page(id, &TrackedPagePatch::acknowledge()).await?)
}

pub async fn check_tracked_page(
    id: TrackedPageId,
    runner: &BatchRunner,
) -> ActionResult<CheckedPage> {
    Ok(runner.check_one(id).await?)
}

pub async fn check_all_tracked_pages(runner: &BatchRunner) -> ActionResult<Vec<PageCheckReport>> {
    Ok(runner.run_stored().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_fields() {
        let input = validate(NewTrackedPage::new("  https://example.org/a  ", " Name ", " cat "))
            .unwrap();
        assert_eq!(input.url, "https://example.org/a");
        assert_eq!(input.name, "Name");
        assert_eq!(input.category, "cat");
    }

    #[test]
    fn validate_rejects_empty_url() {
        let err = validate(NewTrackedPage::new("   ", "", "")).unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }

    #[test]
    fn validate_rejects_relative_and_non_http_urls() {
        assert!(validate(NewTrackedPage::new("/just/a/path", "", "")).is_err());
        assert!(validate(NewTrackedPage::new("mailto:a@b.c", "", "")).is_err());
    }
}
