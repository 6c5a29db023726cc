//! In-memory audit trail.

use parking_lot::RwLock;

use careledger_types::AuditEvent;

use crate::EventSink;

/// Keeps the full trail in memory, in emission order.
///
/// Backs the tests and the consent dashboard's audit view. Events are
/// never mutated or dropped.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in emission order.
    pub fn snapshot(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Events touching one subject, in emission order.
    pub fn events_for_subject(&self, subject: &str) -> Vec<AuditEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.subject == subject)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: AuditEvent) {
        self.events.write().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careledger_types::AuditKind;

    #[test]
    fn keeps_events_in_emission_order() {
        let sink = MemorySink::new();
        sink.emit(AuditEvent::new(
            "p1",
            "",
            1,
            AuditKind::RecordAppended {
                cid: "cidA".to_string(),
            },
        ));
        sink.emit(AuditEvent::new("p2", "d1", 2, AuditKind::AccessRequested));
        sink.emit(AuditEvent::new("p1", "d1", 3, AuditKind::AccessRevoked));

        let trail = sink.snapshot();
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[0].timestamp, 1);
        assert_eq!(trail[2].timestamp, 3);

        let p1 = sink.events_for_subject("p1");
        assert_eq!(p1.len(), 2);
        assert_eq!(p1[0].kind.as_str(), "record_appended");
        assert_eq!(p1[1].kind.as_str(), "access_revoked");
    }
}
