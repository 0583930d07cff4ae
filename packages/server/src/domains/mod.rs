pub mod tasks;
pub mod tracked_pages;
