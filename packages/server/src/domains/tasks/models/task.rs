use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::TaskId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub category: String,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub completed: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(input: NewTask) -> Self {
        Self {
            id: TaskId::new(),
            category: input.category,
            description: input.description,
            deadline: input.deadline,
            completed: false,
            start_time: None,
            end_time: None,
            created_at: Utc::now(),
        }
    }

    /// Replace the editable fields wholesale.
    pub fn apply(&mut self, update: &TaskUpdate) {
        self.category = update.category.clone();
        self.description = update.description.clone();
        self.deadline = update.deadline;
        self.start_time = update.start_time;
        self.end_time = update.end_time;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Full replacement of a task's editable fields. Missing optional fields
/// clear the stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default)]
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}
