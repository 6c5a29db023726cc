//! Record store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use careledger_audit::EventSink;
use careledger_time::Clock;
use careledger_types::{require_non_empty, AuditEvent, AuditKind, Record, Result};

/// Append-only ledger of record pointers keyed by subject.
///
/// `created_at` is assigned from the injected clock inside the append
/// critical section, so list order and timestamp order agree even under
/// concurrent appends. Events are emitted after the lock is released;
/// the state change is authoritative once the map is updated.
pub struct RecordStore {
    records: RwLock<HashMap<String, Vec<Record>>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl RecordStore {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
            sink,
        }
    }

    /// Appends a record pointer for `subject` and returns the stored
    /// record, including its assigned timestamp.
    pub fn append(&self, subject: &str, cid: &str, metadata: &str) -> Result<Record> {
        require_non_empty("subject", subject)?;
        require_non_empty("cid", cid)?;

        let record = {
            let mut records = self.records.write();
            let record = Record {
                cid: cid.to_string(),
                metadata: metadata.to_string(),
                created_at: self.clock.now_us(),
            };
            records
                .entry(subject.to_string())
                .or_default()
                .push(record.clone());
            record
        };

        debug!(subject, cid, "record appended");
        self.sink.emit(AuditEvent::new(
            subject,
            "",
            record.created_at,
            AuditKind::RecordAppended {
                cid: cid.to_string(),
            },
        ));

        Ok(record)
    }

    /// Records for `subject` in append order. Unknown subjects yield an
    /// empty list, not an error.
    ///
    /// No access check happens here: callers disclosing results to a
    /// grantee gate on the consent registry first.
    pub fn list(&self, subject: &str) -> Result<Vec<Record>> {
        let records = self.records.read();
        Ok(records.get(subject).cloned().unwrap_or_default())
    }

    /// Number of records stored for `subject`.
    pub fn record_count(&self, subject: &str) -> usize {
        let records = self.records.read();
        records.get(subject).map(Vec::len).unwrap_or(0)
    }
}
