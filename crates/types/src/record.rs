//! Content-addressed record pointers.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// A record pointer stored for a subject.
///
/// Immutable once appended. The content behind `cid` lives in an
/// external content-addressed store; the core never fetches or
/// validates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Opaque content identifier (e.g. an IPFS CID).
    pub cid: String,
    /// Free-form metadata blob. JSON by convention, opaque here.
    pub metadata: String,
    /// Assigned by the store at append time, never caller-supplied.
    pub created_at: Timestamp,
}
