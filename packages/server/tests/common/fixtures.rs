//! Canned pages and records for tests.

use server_core::domains::tasks::NewTask;
use server_core::domains::tracked_pages::NewTrackedPage;

pub const PAGE_URL: &str = "https://example.org/notice-board";

/// Minimal HTML document whose visible text is exactly `text`.
pub fn html_page(text: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head><title>Notice board</title><script>var ts = {};</script></head>\n  <body>\n    <p>{}</p>\n  </body>\n</html>",
        text.len(),
        text
    )
}

pub fn new_page(url: &str) -> NewTrackedPage {
    NewTrackedPage::new(url, "Notice board", "community")
}

pub fn new_task(category: &str, description: &str) -> NewTask {
    NewTask {
        category: category.to_string(),
        description: description.to_string(),
        deadline: None,
    }
}
