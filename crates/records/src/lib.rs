//! Append-only record pointer ledger.
//!
//! One ordered sequence of content-addressed record pointers per
//! subject. No update or delete exists; append order is the only
//! ordering guarantee. Read access for third parties is gated by the
//! consent registry, not here.

pub mod store;

pub use store::RecordStore;
