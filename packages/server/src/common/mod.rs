// Common types shared across the application

pub mod action_error;
pub mod entity_ids;
pub mod id;
pub mod store_error;

pub use action_error::{ActionError, ActionResult};
pub use entity_ids::*;
pub use id::Id;
pub use store_error::{StoreError, StoreResult};
