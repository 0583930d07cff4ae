// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Change detection lives in domains/tracked_pages and only consumes these.
//
// Naming convention: Base* for trait names (e.g., BasePageFetcher)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Page Fetcher Trait (Infrastructure - network access)
// =============================================================================

/// A successfully retrieved representation of a remote resource.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub content: Vec<u8>,
    pub content_type: Option<String>,
}

impl FetchedPage {
    /// 200 response with an HTML body (handy for tests and mocks).
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content: body.into().into_bytes(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        }
    }
}

/// Why a fetch produced no usable representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("unreachable: {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {code} for {url}")]
    HttpStatus { url: String, code: u16 },

    #[error("malformed response or locator {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Serializable tag for [`FetchError`], reported per page in check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Unreachable,
    Timeout,
    HttpError,
    Malformed,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Unreachable { .. } => FetchErrorKind::Unreachable,
            Self::Timeout { .. } => FetchErrorKind::Timeout,
            Self::HttpStatus { .. } => FetchErrorKind::HttpError,
            Self::Malformed { .. } => FetchErrorKind::Malformed,
        }
    }

    /// Status code for `HttpStatus` failures.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type FetchResult = Result<FetchedPage, FetchError>;

/// Retrieves a resource's current representation.
///
/// Implementations must bound every call in time and report every network
/// condition as a [`FetchError`]; they never panic on bad input and never
/// touch stored state.
#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}
