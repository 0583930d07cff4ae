use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::TrackedPageId;
use crate::domains::tracked_pages::fingerprint::Fingerprint;

/// A web page the user asked us to watch for content changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPage {
    pub id: TrackedPageId,
    /// Immutable after creation so fingerprints stay comparable.
    pub url: String,
    pub name: String,
    pub category: String,
    /// Absent until the first successful check.
    pub fingerprint: Option<Fingerprint>,
    /// Unseen change pending; only an acknowledgement clears it.
    pub changed: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TrackedPage {
    /// A never-checked page built from user input.
    pub fn new(input: NewTrackedPage) -> Self {
        Self {
            id: TrackedPageId::new(),
            url: input.url,
            name: input.name,
            category: input.category,
            fingerprint: None,
            changed: false,
            last_checked_at: None,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: &TrackedPagePatch) {
        if let Some(fingerprint) = &patch.fingerprint {
            self.fingerprint = Some(fingerprint.clone());
        }
        if let Some(changed) = patch.changed {
            self.changed = changed;
        }
        if let Some(checked_at) = patch.last_checked_at {
            self.last_checked_at = Some(checked_at);
        }
    }
}

/// User-supplied fields for a new tracked page.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrackedPage {
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

impl NewTrackedPage {
    pub fn new(url: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Partial update of a tracked page's detection state.
///
/// Every field is optional; `None` leaves the stored value untouched. Stores
/// apply a patch as one unit, never field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedPagePatch {
    pub fingerprint: Option<Fingerprint>,
    pub changed: Option<bool>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl TrackedPagePatch {
    /// Clear the unseen-change flag; fingerprint and check time are kept.
    pub fn acknowledge() -> Self {
        Self {
            changed: Some(false),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprint.is_none() && self.changed.is_none() && self.last_checked_at.is_none()
    }
}
