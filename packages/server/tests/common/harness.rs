//! Test harness wiring the real detector, runner and routes to an in-memory
//! store and a scripted fetcher.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use server_core::domains::tracked_pages::{actions, TrackedPage};
use server_core::kernel::{BasePageFetcher, MemoryStore, MockPageFetcher, ServerDeps};
use server_core::server::build_app;

use super::new_page;

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub fetcher: MockPageFetcher,
    pub deps: ServerDeps,
}

impl TestHarness {
    pub fn new(fetcher: MockPageFetcher) -> Self {
        Self::with_concurrency(fetcher, 4)
    }

    pub fn with_concurrency(fetcher: MockPageFetcher, concurrency: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let deps = ServerDeps::new(
            store.clone(),
            store.clone(),
            Arc::new(fetcher.clone()),
            concurrency,
        );
        Self {
            store,
            fetcher,
            deps,
        }
    }

    /// Harness around an arbitrary fetcher (e.g. one that misbehaves).
    pub fn with_fetcher(fetcher: Arc<dyn BasePageFetcher>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let deps = ServerDeps::new(store.clone(), store.clone(), fetcher, 4);
        Self {
            store,
            fetcher: MockPageFetcher::new(),
            deps,
        }
    }

    /// Register a page through the same path the API uses.
    pub async fn track(&self, url: &str) -> TrackedPage {
        actions::create_tracked_page(new_page(url), self.store.as_ref())
            .await
            .expect("Failed to create tracked page")
    }

    pub fn router(&self) -> Router {
        build_app(self.deps.clone(), None)
    }

    /// Send one request through the router and decode the JSON body.
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("Router failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
