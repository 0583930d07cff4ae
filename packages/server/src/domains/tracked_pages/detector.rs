//! Change detector: fetch → extract → fingerprint → compare.
//!
//! A detection never writes anything itself. It returns the outcome together
//! with the exact patch the caller must persist, so the decision and the
//! state update cannot drift apart.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domains::tracked_pages::fingerprint::{fingerprint, ExtractionError, Fingerprint};
use crate::domains::tracked_pages::models::{TrackedPage, TrackedPagePatch};
use crate::kernel::{BasePageFetcher, FetchError, FetchErrorKind};

/// Why a check could not produce a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckFailure {
    Fetch {
        kind: FetchErrorKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_code: Option<u16>,
        message: String,
    },
    Extraction {
        message: String,
    },
}

impl From<&FetchError> for CheckFailure {
    fn from(err: &FetchError) -> Self {
        Self::Fetch {
            kind: err.kind(),
            http_code: err.http_code(),
            message: err.to_string(),
        }
    }
}

impl From<&ExtractionError> for CheckFailure {
    fn from(err: &ExtractionError) -> Self {
        Self::Extraction {
            message: err.to_string(),
        }
    }
}

/// Result of checking one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DetectionOutcome {
    /// First successful check; nothing to compare against.
    Baseline { fingerprint: Fingerprint },
    Unchanged { fingerprint: Fingerprint },
    Changed {
        previous: Fingerprint,
        fingerprint: Fingerprint,
    },
    /// The page could not be checked; stored state stays authoritative.
    Failed { error: CheckFailure },
}

impl DetectionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline { .. } => "baseline",
            Self::Unchanged { .. } => "unchanged",
            Self::Changed { .. } => "changed",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One outcome plus the single patch that records it.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub outcome: DetectionOutcome,
    pub patch: TrackedPagePatch,
}

impl Detection {
    fn failed(error: CheckFailure, checked_at: DateTime<Utc>) -> Self {
        Self {
            outcome: DetectionOutcome::Failed { error },
            // Only the attempt is recorded; fingerprint and changed are kept.
            patch: TrackedPagePatch {
                last_checked_at: Some(checked_at),
                ..Default::default()
            },
        }
    }
}

/// Compare a freshly computed fingerprint against the page's stored state.
///
/// Never turns `changed` from true to false: an unseen change stays pending
/// until acknowledged, even if later checks see the same content.
pub fn decide(page: &TrackedPage, current: Fingerprint, checked_at: DateTime<Utc>) -> Detection {
    match &page.fingerprint {
        None => Detection {
            patch: TrackedPagePatch {
                fingerprint: Some(current.clone()),
                changed: Some(false),
                last_checked_at: Some(checked_at),
            },
            outcome: DetectionOutcome::Baseline {
                fingerprint: current,
            },
        },
        Some(previous) if *previous == current => Detection {
            patch: TrackedPagePatch {
                fingerprint: Some(current.clone()),
                changed: None,
                last_checked_at: Some(checked_at),
            },
            outcome: DetectionOutcome::Unchanged {
                fingerprint: current,
            },
        },
        Some(previous) => Detection {
            patch: TrackedPagePatch {
                fingerprint: Some(current.clone()),
                changed: Some(true),
                last_checked_at: Some(checked_at),
            },
            outcome: DetectionOutcome::Changed {
                previous: previous.clone(),
                fingerprint: current,
            },
        },
    }
}

pub struct ChangeDetector {
    fetcher: Arc<dyn BasePageFetcher>,
}

impl ChangeDetector {
    pub fn new(fetcher: Arc<dyn BasePageFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn detect(&self, page: &TrackedPage) -> Detection {
        let fetched = self.fetcher.fetch(&page.url).await;
        let checked_at = Utc::now();

        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!(page_id = %page.id, url = %page.url, error = %e, "Check failed: fetch");
                return Detection::failed(CheckFailure::from(&e), checked_at);
            }
        };

        let current = match fingerprint(&fetched.content, fetched.content_type.as_deref()) {
            Ok(fp) => fp,
            Err(e) => {
                warn!(page_id = %page.id, url = %page.url, error = %e, "Check failed: extraction");
                return Detection::failed(CheckFailure::from(&e), checked_at);
            }
        };

        let detection = decide(page, current, checked_at);
        match &detection.outcome {
            DetectionOutcome::Changed { .. } => {
                info!(page_id = %page.id, url = %page.url, "Page content changed")
            }
            outcome => {
                debug!(page_id = %page.id, url = %page.url, outcome = outcome.label(), "Page checked")
            }
        }
        detection
    }
}
