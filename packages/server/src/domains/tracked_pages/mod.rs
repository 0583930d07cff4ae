//! Tracked pages: user-registered URLs watched for content changes.

pub mod actions;
pub mod batch;
pub mod detector;
pub mod fingerprint;
pub mod models;
pub mod store;

pub use batch::{BatchRunner, BatchSummary, CheckedPage, PageCheckReport, RunError};
pub use detector::{ChangeDetector, CheckFailure, Detection, DetectionOutcome};
pub use fingerprint::{fingerprint, ExtractionError, Fingerprint};
pub use models::{NewTrackedPage, TrackedPage, TrackedPagePatch};
pub use store::TrackedPageStore;
