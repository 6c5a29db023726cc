//! Facade wiring the record store and consent registry together.

use std::sync::Arc;

use careledger_audit::{BufferedSink, EventSink, JsonlSink, MemorySink};
use careledger_consent::ConsentRegistry;
use careledger_records::RecordStore;
use careledger_time::{Clock, SystemClock};
use careledger_types::{Record, Result};

use crate::RegistryConfig;

/// Outcome of a consent-gated read.
///
/// Denial is a value, not an error: upstream handlers map it to their
/// own "access denied" response and must not conflate it with the
/// validation errors in `RegistryError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted(Vec<Record>),
    Denied,
}

/// One record store plus one consent registry over a shared clock and
/// audit sink.
pub struct Registry {
    records: RecordStore,
    consent: ConsentRegistry,
}

impl Registry {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            records: RecordStore::new(clock.clone(), sink.clone()),
            consent: ConsentRegistry::new(clock, sink),
        }
    }

    /// Builds a registry from configuration: a monotonic system clock,
    /// and a JSONL audit log when `audit_log_path` is set (an in-memory
    /// trail otherwise), optionally behind buffered dispatch.
    ///
    /// `buffered_audit = true` spawns the dispatch task and therefore
    /// requires a running tokio runtime.
    pub fn from_config(config: &RegistryConfig) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

        let sink: Arc<dyn EventSink> = match &config.audit_log_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "audit trail -> JSONL file");
                Arc::new(JsonlSink::new(path)?)
            }
            None => Arc::new(MemorySink::new()),
        };
        let sink: Arc<dyn EventSink> = if config.buffered_audit {
            Arc::new(BufferedSink::spawn(sink))
        } else {
            sink
        };

        Ok(Self::new(clock, sink))
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn consent(&self) -> &ConsentRegistry {
        &self.consent
    }

    /// The canonical disclosure flow: check consent, then list.
    ///
    /// Returns `Denied` without touching the record map when no active
    /// grant exists. Subjects reading their own records call
    /// [`RecordStore::list`] directly; this path is for grantees.
    pub fn records_for_grantee(&self, subject: &str, grantee: &str) -> Result<AccessDecision> {
        if !self.consent.check(subject, grantee)? {
            return Ok(AccessDecision::Denied);
        }
        Ok(AccessDecision::Granted(self.records.list(subject)?))
    }
}
