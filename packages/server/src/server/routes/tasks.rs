use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::TaskId;
use crate::domains::tasks::actions;
use crate::domains::tasks::{NewTask, Task, TaskUpdate};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CompletionRequest {
    #[serde(alias = "isCompleted")]
    pub completed: bool,
}

pub async fn create_task_handler(
    Extension(state): Extension<AxumAppState>,
    Json(input): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = actions::create_task(input, state.deps.tasks.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks_handler(
    Extension(state): Extension<AxumAppState>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(actions::list_tasks(state.deps.tasks.as_ref()).await?))
}

pub async fn list_tasks_by_category_handler(
    Extension(state): Extension<AxumAppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(
        actions::list_tasks_by_category(&category, state.deps.tasks.as_ref()).await?,
    ))
}

pub async fn set_task_completed_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TaskId>,
    Json(body): Json<CompletionRequest>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(
        actions::set_task_completed(id, body.completed, state.deps.tasks.as_ref()).await?,
    ))
}

pub async fn toggle_task_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(
        actions::toggle_task_completed(id, state.deps.tasks.as_ref()).await?,
    ))
}

pub async fn update_task_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TaskId>,
    Json(update): Json<TaskUpdate>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(
        actions::update_task(id, update, state.deps.tasks.as_ref()).await?,
    ))
}

pub async fn delete_task_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(actions::delete_task(id, state.deps.tasks.as_ref()).await?))
}
