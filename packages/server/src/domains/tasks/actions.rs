use tracing::info;

use crate::common::{ActionResult, TaskId};
use crate::domains::tasks::models::{NewTask, Task, TaskUpdate};
use crate::domains::tasks::store::TaskStore;

pub async fn create_task(input: NewTask, store: &dyn TaskStore) -> ActionResult<Task> {
    let task = store.insert_task(Task::new(input)).await?;
    info!(task_id = %task.id, category = %task.category, "Task created");
    Ok(task)
}

pub async fn list_tasks(store: &dyn TaskStore) -> ActionResult<Vec<Task>> {
    Ok(store.list_tasks().await?)
}

pub async fn list_tasks_by_category(category: &str, store: &dyn TaskStore) -> ActionResult<Vec<Task>> {
    Ok(store.list_tasks_by_category(category).await?)
}

pub async fn update_task(id: TaskId, update: TaskUpdate, store: &dyn TaskStore) -> ActionResult<Task> {
    Ok(store.update_task(id, &update).await?)
}

pub async fn set_task_completed(id: TaskId, completed: bool, store: &dyn TaskStore) -> ActionResult<Task> {
    Ok(store.set_task_completed(id, completed).await?)
}

pub async fn toggle_task_completed(id: TaskId, store: &dyn TaskStore) -> ActionResult<Task> {
    Ok(store.toggle_task_completed(id).await?)
}

pub async fn delete_task(id: TaskId, store: &dyn TaskStore) -> ActionResult<Task> {
    let task = store.delete_task(id).await?;
    info!(task_id = %id, "Task deleted");
    Ok(task)
}
