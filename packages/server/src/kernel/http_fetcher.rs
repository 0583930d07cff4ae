//! HTTP page fetcher - reqwest with a hard per-request deadline.
//!
//! Every outcome, including bad locators and oversized bodies, is reported as
//! a [`FetchError`] so a batch of checks never stalls or aborts on one page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{BasePageFetcher, FetchError, FetchResult, FetchedPage};

/// Browser-like User-Agent; some sites serve placeholder pages to unknown bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_body_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches tracked pages over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    fn validate_locator(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::Malformed {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    fn classify(url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_builder() {
            FetchError::Malformed {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            FetchError::Unreachable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    fn too_large(&self, url: &str) -> FetchError {
        FetchError::Malformed {
            url: url.to_string(),
            reason: format!("body exceeds {} bytes", self.max_body_bytes),
        }
    }
}

#[async_trait]
impl BasePageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let target = Self::validate_locator(url).map_err(|e| {
            warn!(url = %url, error = %e, "Rejected locator");
            e
        })?;

        debug!(url = %url, "Fetching page");
        let mut response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| {
                let err = Self::classify(url, e);
                warn!(url = %url, error = %err, "Page fetch failed");
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Page returned error status");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared > self.max_body_bytes as u64 {
                warn!(url = %url, declared, "Page body too large");
                return Err(self.too_large(url));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let mut content = Vec::new();
        loop {
            let chunk = response.chunk().await.map_err(|e| {
                let err = Self::classify(url, e);
                warn!(url = %url, error = %err, "Failed reading page body");
                err
            })?;
            let Some(chunk) = chunk else { break };
            if content.len() + chunk.len() > self.max_body_bytes {
                warn!(url = %url, "Page body too large");
                return Err(self.too_large(url));
            }
            content.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = content.len(), "Fetched page");
        Ok(FetchedPage {
            status: status.as_u16(),
            content,
            content_type,
        })
    }
}
