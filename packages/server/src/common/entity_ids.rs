//! Typed ID definitions for the stored records.

pub use super::id::Id;

/// Marker type for tracked web pages.
pub struct TrackedPageEntity;

/// Marker type for scheduled tasks.
pub struct TaskEntity;

/// Typed ID for tracked pages.
pub type TrackedPageId = Id<TrackedPageEntity>;

/// Typed ID for tasks.
pub type TaskId = Id<TaskEntity>;
