use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by the record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced record does not exist (or vanished mid-operation).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// The backing store could not complete the operation.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<Uuid>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
