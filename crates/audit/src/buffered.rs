//! Channel-decoupled event dispatch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use careledger_types::AuditEvent;

use crate::EventSink;

/// Decouples event producers from a potentially slow inner sink.
///
/// `emit` enqueues on an unbounded channel; a spawned task drains the
/// channel into the inner sink, preserving emission order. Once the
/// forwarding task is gone, emission degrades to a traced no-op rather
/// than an error.
pub struct BufferedSink {
    tx: mpsc::UnboundedSender<AuditEvent>,
}

impl BufferedSink {
    /// Spawns the forwarding task. Must be called within a tokio
    /// runtime; the task exits when the sink is dropped.
    pub fn spawn(inner: Arc<dyn EventSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                inner.emit(event);
            }
        });

        Self { tx }
    }
}

impl EventSink for BufferedSink {
    fn emit(&self, event: AuditEvent) {
        if self.tx.send(event).is_err() {
            warn!("audit dispatch channel closed; event dropped");
        }
    }
}
