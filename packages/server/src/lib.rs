// Memo API Core
//
// Backend for the memo app: scheduled tasks plus tracked web pages with
// content change detection. Domain logic lives in domains/, infrastructure
// (fetching, storage) in kernel/, HTTP wiring in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
