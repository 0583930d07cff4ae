pub mod tracked_page;

pub use tracked_page::{NewTrackedPage, TrackedPage, TrackedPagePatch};
