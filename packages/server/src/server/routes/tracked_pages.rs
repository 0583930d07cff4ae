use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::common::TrackedPageId;
use crate::domains::tracked_pages::actions;
use crate::domains::tracked_pages::{
    BatchSummary, CheckedPage, DetectionOutcome, NewTrackedPage, PageCheckReport, TrackedPage,
};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Per-page entry of a batch check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCheckView {
    pub page_id: TrackedPageId,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<DetectionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<TrackedPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<PageCheckReport> for PageCheckView {
    fn from(report: PageCheckReport) -> Self {
        match report.result {
            Ok(checked) => Self {
                page_id: report.page_id,
                ok: true,
                outcome: Some(checked.outcome),
                page: Some(checked.page),
                error: None,
            },
            Err(e) => Self {
                page_id: report.page_id,
                ok: false,
                outcome: None,
                page: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchCheckResponse {
    pub summary: BatchSummary,
    pub results: Vec<PageCheckView>,
}

pub async fn create_page_handler(
    Extension(state): Extension<AxumAppState>,
    Json(input): Json<NewTrackedPage>,
) -> Result<(StatusCode, Json<TrackedPage>), ApiError> {
    let page = actions::create_tracked_page(input, state.deps.pages.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn list_pages_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<Vec<TrackedPage>>, ApiError> {
    Ok(Json(actions::list_tracked_pages(state.deps.pages.as_ref()).await?))
}

pub async fn delete_page_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TrackedPageId>,
) -> Result<Json<TrackedPage>, ApiError> {
    Ok(Json(actions::delete_tracked_page(id, state.deps.pages.as_ref()).await?))
}

pub async fn acknowledge_page_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TrackedPageId>,
) -> Result<Json<TrackedPage>, ApiError> {
    Ok(Json(
        actions::acknowledge_tracked_page(id, state.deps.pages.as_ref()).await?,
    ))
}

pub async fn check_page_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TrackedPageId>,
) -> Result<Json<CheckedPage>, ApiError> {
    Ok(Json(actions::check_tracked_page(id, &state.deps.runner).await?))
}

/// Check every tracked page. Always 200 once the page list is loaded;
/// per-page failures are reported inside the body.
pub async fn check_all_pages_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<BatchCheckResponse>, ApiError> {
    let reports = actions::check_all_tracked_pages(&state.deps.runner).await?;
    let summary = BatchSummary::from_reports(&reports);
    Ok(Json(BatchCheckResponse {
        summary,
        results: reports.into_iter().map(PageCheckView::from).collect(),
    }))
}
