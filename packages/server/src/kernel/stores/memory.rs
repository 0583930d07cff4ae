//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{StoreError, StoreResult, TaskId, TrackedPageId};
use crate::domains::tasks::{Task, TaskStore, TaskUpdate};
use crate::domains::tracked_pages::{TrackedPage, TrackedPagePatch, TrackedPageStore};

const TRACKED_PAGE: &str = "tracked page";
const TASK: &str = "task";

/// In-memory storage for tracked pages and tasks.
///
/// Every write happens under the map's write lock, so a patch is never
/// visible half-applied. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<TrackedPageId, TrackedPage>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
}

// A poisoned lock only means another writer panicked; the maps themselves
// hold whole records and stay consistent.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        read(&self.pages).len()
    }

    pub fn task_count(&self) -> usize {
        read(&self.tasks).len()
    }
}

#[async_trait]
impl TrackedPageStore for MemoryStore {
    async fn list_pages(&self) -> StoreResult<Vec<TrackedPage>> {
        let mut pages: Vec<TrackedPage> = read(&self.pages).values().cloned().collect();
        pages.sort_by_key(|p| (p.created_at, p.id));
        Ok(pages)
    }

    async fn find_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        read(&self.pages)
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))
    }

    async fn insert_page(&self, page: TrackedPage) -> StoreResult<TrackedPage> {
        write(&self.pages).insert(page.id, page.clone());
        Ok(page)
    }

    async fn update_page(
        &self,
        id: TrackedPageId,
        patch: &TrackedPagePatch,
    ) -> StoreResult<TrackedPage> {
        let mut pages = write(&self.pages);
        let page = pages
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))?;
        page.apply(patch);
        Ok(page.clone())
    }

    async fn delete_page(&self, id: TrackedPageId) -> StoreResult<TrackedPage> {
        write(&self.pages)
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(TRACKED_PAGE, id))
    }
}

impl MemoryStore {
    fn modify_task(&self, id: TaskId, f: impl FnOnce(&mut Task)) -> StoreResult<Task> {
        let mut tasks = write(&self.tasks);
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(TASK, id))?;
        f(task);
        Ok(task.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = read(&self.tasks).values().cloned().collect();
        tasks.sort_by_key(|t| (t.created_at, t.id));
        Ok(tasks)
    }

    async fn list_tasks_by_category(&self, category: &str) -> StoreResult<Vec<Task>> {
        let mut tasks = self.list_tasks().await?;
        tasks.retain(|t| t.category == category);
        Ok(tasks)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Task> {
        read(&self.tasks)
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(TASK, id))
    }

    async fn insert_task(&self, task: Task) -> StoreResult<Task> {
        write(&self.tasks).insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> StoreResult<Task> {
        self.modify_task(id, |task| task.apply(update))
    }

    async fn set_task_completed(&self, id: TaskId, completed: bool) -> StoreResult<Task> {
        self.modify_task(id, |task| task.completed = completed)
    }

    async fn toggle_task_completed(&self, id: TaskId) -> StoreResult<Task> {
        self.modify_task(id, |task| task.completed = !task.completed)
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<Task> {
        write(&self.tasks)
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(TASK, id))
    }
}
