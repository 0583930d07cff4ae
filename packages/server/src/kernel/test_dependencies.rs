// Mock implementations for testing
//
// Provides scripted infrastructure that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::{BasePageFetcher, FetchError, FetchResult, FetchedPage};

// =============================================================================
// Mock Page Fetcher
// =============================================================================

/// Fetcher that replays scripted responses per URL.
///
/// Responses for a URL are consumed in order; the last one is repeated once
/// the script runs out. URLs with no script are reported as unreachable.
#[derive(Clone, Default)]
pub struct MockPageFetcher {
    responses: Arc<Mutex<HashMap<String, VecDeque<FetchResult>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an HTML response for `url`.
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.push(url, Ok(FetchedPage::html(html)));
        self
    }

    /// Queue an arbitrary response for `url`.
    pub fn with_response(self, url: &str, response: FetchResult) -> Self {
        self.push(url, response);
        self
    }

    /// Queue a failure for `url`.
    pub fn with_failure(self, url: &str, error: FetchError) -> Self {
        self.push(url, Err(error));
        self
    }

    /// Queue a response on an already shared mock (between checks).
    pub fn push(&self, url: &str, response: FetchResult) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.calls.lock().unwrap().push(url.to_string());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(FetchError::Unreachable {
                url: url.to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_repeats_last() {
        let mock = MockPageFetcher::new()
            .with_page("https://a.test", "one")
            .with_page("https://a.test", "two");

        let first = mock.fetch("https://a.test").await.unwrap();
        let second = mock.fetch("https://a.test").await.unwrap();
        let third = mock.fetch("https://a.test").await.unwrap();

        assert_eq!(first.content, b"one");
        assert_eq!(second.content, b"two");
        assert_eq!(third.content, b"two");
        assert_eq!(mock.call_count("https://a.test"), 3);
    }

    #[tokio::test]
    async fn unknown_url_is_unreachable() {
        let mock = MockPageFetcher::new();
        let err = mock.fetch("https://missing.test").await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable { .. }));
    }
}
