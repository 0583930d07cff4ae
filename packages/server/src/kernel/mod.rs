//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod http_fetcher;
pub mod stores;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use http_fetcher::{FetcherConfig, HttpFetcher};
pub use stores::{MemoryStore, PostgresStore};
pub use test_dependencies::MockPageFetcher;
pub use traits::*;
