//! Audit trail events.
//!
//! Every state-changing operation on the record store or consent
//! registry produces exactly one event. Events are append-only and are
//! the only audit surface; the core never derives state from them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Timestamp;

/// Kind-specific payload of an audit event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditKind {
    /// A record pointer was appended for the subject.
    RecordAppended { cid: String },
    /// A grantee signalled interest in the subject's records.
    /// Advisory only: confers no authorization.
    AccessRequested,
    /// Access was granted or renewed until `expires_at`.
    AccessGranted { expires_at: Timestamp },
    /// Access was revoked. Emitted even when no grant existed.
    AccessRevoked,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecordAppended { .. } => "record_appended",
            Self::AccessRequested => "access_requested",
            Self::AccessGranted { .. } => "access_granted",
            Self::AccessRevoked => "access_revoked",
        }
    }
}

/// Immutable audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: Uuid,
    pub subject: String,
    /// Empty for record appends.
    pub grantee: String,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: AuditKind,
}

impl AuditEvent {
    pub fn new(
        subject: impl Into<String>,
        grantee: impl Into<String>,
        timestamp: Timestamp,
        kind: AuditKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            grantee: grantee.into(),
            timestamp,
            kind,
        }
    }
}
