use async_trait::async_trait;

use crate::common::{StoreResult, TaskId};
use crate::domains::tasks::models::{Task, TaskUpdate};

/// Record store for tasks. Plain storage, no derived state.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks, oldest first.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    async fn list_tasks_by_category(&self, category: &str) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: TaskId) -> StoreResult<Task>;

    async fn insert_task(&self, task: Task) -> StoreResult<Task>;

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> StoreResult<Task>;

    async fn set_task_completed(&self, id: TaskId, completed: bool) -> StoreResult<Task>;

    /// Flip the completion flag in one step.
    async fn toggle_task_completed(&self, id: TaskId) -> StoreResult<Task>;

    async fn delete_task(&self, id: TaskId) -> StoreResult<Task>;
}
