//! Audit event sinks.
//!
//! Every state-changing registry operation hands its event to an
//! [`EventSink`]. Emission is a side channel: sinks never feed state
//! back into the core, and a failing or slow sink must never fail or
//! stall the operation that produced the event.

pub mod buffered;
pub mod jsonl;
pub mod memory;

pub use buffered::BufferedSink;
pub use jsonl::JsonlSink;
pub use memory::MemorySink;

use careledger_types::AuditEvent;

/// Append-only audit event receiver.
///
/// `emit` is a handoff. Implementations must not block the caller on
/// delivery; delivery failures stay inside the sink. State changes are
/// authoritative the instant the emitting operation returns, whether or
/// not the event ever lands.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}
