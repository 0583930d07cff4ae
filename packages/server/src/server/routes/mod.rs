// HTTP routes
pub mod health;
pub mod tasks;
pub mod tracked_pages;

pub use health::*;
pub use tasks::*;
pub use tracked_pages::*;
