//! Tasks: plain scheduled to-do records.

pub mod actions;
pub mod models;
pub mod store;

pub use models::{NewTask, Task, TaskUpdate};
pub use store::TaskStore;
