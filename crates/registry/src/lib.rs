//! Process-level registry facade.
//!
//! Owns one `RecordStore` and one `ConsentRegistry` over a shared
//! clock and audit sink, constructed once per process and handed to
//! callers by reference. No ambient singletons. The transport layer
//! above (HTTP handlers, wallet resolution) lives outside this
//! workspace and consumes this crate's API.

pub mod config;
pub mod registry;

pub use config::{init_logging, RegistryConfig};
pub use registry::{AccessDecision, Registry};
