//! Time-bounded consent registry.
//!
//! Grants, checks, and revokes third-party read access to a subject's
//! records. Expiry is evaluated lazily against the injected clock on
//! every check; lapsed entries linger until revoked or overwritten.
//! Every state-changing operation emits one audit event.

pub mod registry;

pub use registry::ConsentRegistry;
