//! PostgreSQL storage via sqlx. Schema lives in `migrations/`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{StoreError, StoreResult, TaskId, TrackedPageId};
use crate::domains::tasks::{Task, TaskStore, TaskUpdate};
use crate::domains::tracked_pages::{TrackedPage, TrackedPagePatch, TrackedPageStore};

const TRACKED_PAGE: &str = "tracked page";
const TASK: &str = "task";

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// Tracked pages
// =============================================================================

#[async_trait]
impl TrackedPageStore for PostgresStore {
    async fn list_pages(&self) -> StoreResult<Vec<TrackedPage>> {
        sqlx::query_as::<_, TrackedPage>(
            "SELECT * FROM tracked_pages ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        sqlx::query_as::<_, TrackedPage>("SELECT * FROM tracked_pages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))
    }

    async fn insert_page(&self, page: TrackedPage) -> StoreResult<TrackedPage> {
        sqlx::query_as::<_, TrackedPage>(
            r#"
            INSERT INTO tracked_pages (
                id, url, name, category, fingerprint, changed, last_checked_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(page.id)
        .bind(&page.url)
        .bind(&page.name)
        .bind(&page.category)
        .bind(&page.fingerprint)
        .bind(page.changed)
        .bind(page.last_checked_at)
        .bind(page.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn update_page(
        &self,
        id: TrackedPageId,
        patch: &TrackedPagePatch,
    ) -> StoreResult<TrackedPage> {
        // One statement, so the row is never observed half-patched.
        sqlx::query_as::<_, TrackedPage>(
            r#"
            UPDATE tracked_pages
            SET fingerprint = COALESCE($2, fingerprint),
                changed = COALESCE($3, changed),
                last_checked_at = COALESCE($4, last_checked_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.fingerprint)
        .bind(patch.changed)
        .bind(patch.last_checked_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))
    }

    async fn delete_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        sqlx::query_as::<_, TrackedPage>("DELETE FROM tracked_pages WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))
    }
}

// =============================================================================
// Tasks
// =============================================================================

#[async_trait]
impl TaskStore for PostgresStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_tasks_by_category(&self, category: &str) -> StoreResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE category = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(TASK, id))
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (
                id, category, description, deadline, completed, start_time, end_time, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(&task.category)
        .bind(&task.description)
        .bind(task.deadline)
        .bind(task.completed)
        .bind(task.start_time)
        .bind(task.end_time)
        .bind(task.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET category = $2, description = $3, deadline = $4, start_time = $5, end_time = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.category)
        .bind(&update.description)
        .bind(update.deadline)
        .bind(update.start_time)
        .bind(update.end_time)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(TASK, id))
    }

    async fn set_task_completed(&self, id: TaskId, completed: bool) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>("UPDATE tasks SET completed = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(completed)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(TASK, id))
    }

    async fn toggle_task_completed(&self, id: TaskId) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET completed = NOT completed WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(TASK, id))
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<Task> {
        sqlx::query_as::<_, Task>("DELETE FROM tasks WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(TASK, id))
    }
}
