//! Time-bounded access grants.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Authorization for one (subject, grantee) pair.
///
/// A re-grant overwrites the whole entry; a lapsed grant lingers in the
/// map until revoked or overwritten, and is filtered out at check time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessGrant {
    /// When the grant was created or last renewed.
    pub granted_at: Timestamp,
    /// Absolute expiry. Access is denied at and after this instant.
    pub expires_at: Timestamp,
}

impl AccessGrant {
    /// True while the expiry lies strictly in the future.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.expires_at > now
    }
}
