//! Consent registry implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use careledger_audit::EventSink;
use careledger_time::Clock;
use careledger_types::{
    require_non_empty, AccessGrant, AuditEvent, AuditKind, RegistryError, Result, Timestamp,
    MICROS_PER_SEC,
};

/// Time-bounded access authorization between subjects and grantees.
///
/// One entry per (subject, grantee) pair; a re-grant overwrites the
/// entry rather than stacking durations. Expiry is never swept: a
/// lapsed entry behaves as absent for authorization and is filtered out
/// at read time. Events are emitted after the map lock is released.
pub struct ConsentRegistry {
    grants: RwLock<HashMap<(String, String), AccessGrant>>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
}

impl ConsentRegistry {
    pub fn new(clock: Arc<dyn Clock>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
            clock,
            sink,
        }
    }

    /// Grants (or renews) access for `duration_secs` from now and
    /// returns the new absolute expiry.
    pub fn grant(&self, subject: &str, grantee: &str, duration_secs: i64) -> Result<Timestamp> {
        require_non_empty("subject", subject)?;
        require_non_empty("grantee", grantee)?;
        if duration_secs <= 0 {
            return Err(RegistryError::InvalidDuration {
                seconds: duration_secs,
            });
        }

        let (granted_at, expires_at) = {
            let mut grants = self.grants.write();
            let granted_at = self.clock.now_us();
            let expires_at =
                granted_at.saturating_add((duration_secs as u64).saturating_mul(MICROS_PER_SEC));
            grants.insert(
                (subject.to_string(), grantee.to_string()),
                AccessGrant {
                    granted_at,
                    expires_at,
                },
            );
            (granted_at, expires_at)
        };

        debug!(subject, grantee, expires_at, "access granted");
        self.sink.emit(AuditEvent::new(
            subject,
            grantee,
            granted_at,
            AuditKind::AccessGranted { expires_at },
        ));

        Ok(expires_at)
    }

    /// Deletes the grant for the pair. Succeeds whether or not a grant
    /// existed and always emits, so revocations stay observable in the
    /// trail even when they were no-ops.
    pub fn revoke(&self, subject: &str, grantee: &str) -> Result<()> {
        require_non_empty("subject", subject)?;
        require_non_empty("grantee", grantee)?;

        let removed = {
            let mut grants = self.grants.write();
            grants
                .remove(&(subject.to_string(), grantee.to_string()))
                .is_some()
        };

        debug!(subject, grantee, removed, "access revoked");
        self.sink.emit(AuditEvent::new(
            subject,
            grantee,
            self.clock.now_us(),
            AuditKind::AccessRevoked,
        ));

        Ok(())
    }

    /// Pure authorization query: true iff a grant exists with its expiry
    /// strictly in the future. Denied at the exact expiry instant.
    /// Never mutates state and never emits.
    pub fn check(&self, subject: &str, grantee: &str) -> Result<bool> {
        let now = self.clock.now_us();
        let grants = self.grants.read();
        Ok(grants
            .get(&(subject.to_string(), grantee.to_string()))
            .is_some_and(|grant| grant.is_active_at(now)))
    }

    /// Records a grantee's interest in the subject's records. Advisory
    /// only: emits `AccessRequested` and changes nothing else.
    pub fn request(&self, subject: &str, grantee: &str) -> Result<()> {
        require_non_empty("subject", subject)?;
        require_non_empty("grantee", grantee)?;

        debug!(subject, grantee, "access requested");
        self.sink.emit(AuditEvent::new(
            subject,
            grantee,
            self.clock.now_us(),
            AuditKind::AccessRequested,
        ));

        Ok(())
    }

    /// The stored expiry for the pair, even when it has already lapsed;
    /// `None` when no grant exists. Callers wanting "is it still valid"
    /// use [`check`](Self::check): comparing this value against their
    /// own clock reintroduces the skew bugs the injected clock avoids.
    pub fn expiry_of(&self, subject: &str, grantee: &str) -> Result<Option<Timestamp>> {
        let grants = self.grants.read();
        Ok(grants
            .get(&(subject.to_string(), grantee.to_string()))
            .map(|grant| grant.expires_at))
    }

    /// Grantees currently holding an unexpired grant for `subject`.
    /// Pure query, no events.
    pub fn active_grants(&self, subject: &str) -> Vec<(String, AccessGrant)> {
        let now = self.clock.now_us();
        let grants = self.grants.read();
        grants
            .iter()
            .filter(|((s, _), grant)| s == subject && grant.is_active_at(now))
            .map(|((_, grantee), grant)| (grantee.clone(), *grant))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careledger_audit::MemorySink;
    use careledger_time::ManualClock;

    const T0: Timestamp = 1_000_000_000;

    fn registry_with_trail() -> (ConsentRegistry, Arc<MemorySink>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let sink = Arc::new(MemorySink::new());
        let registry = ConsentRegistry::new(clock.clone(), sink.clone());
        (registry, sink, clock)
    }

    #[test]
    fn no_access_before_any_grant() {
        let (registry, _, _) = registry_with_trail();
        assert!(!registry.check("p1", "d1").unwrap());
        assert_eq!(registry.expiry_of("p1", "d1").unwrap(), None);
    }

    #[test]
    fn grant_then_check_then_revoke() {
        let (registry, _, _) = registry_with_trail();

        registry.grant("p1", "d1", 3600).unwrap();
        assert!(registry.check("p1", "d1").unwrap());

        registry.revoke("p1", "d1").unwrap();
        assert!(!registry.check("p1", "d1").unwrap());
        assert_eq!(registry.expiry_of("p1", "d1").unwrap(), None);
    }

    #[test]
    fn access_lapses_at_the_expiry_instant() {
        let (registry, _, clock) = registry_with_trail();

        let expires_at = registry.grant("p1", "d1", 10).unwrap();
        assert_eq!(expires_at, T0 + 10 * MICROS_PER_SEC);

        clock.set(expires_at - 1);
        assert!(registry.check("p1", "d1").unwrap());

        clock.set(expires_at);
        assert!(!registry.check("p1", "d1").unwrap());

        // Lapsed, not deleted: the stored expiry remains visible.
        assert_eq!(registry.expiry_of("p1", "d1").unwrap(), Some(expires_at));
    }

    #[test]
    fn regrant_replaces_expiry_instead_of_extending() {
        let (registry, _, clock) = registry_with_trail();

        registry.grant("p1", "d1", 10).unwrap();
        clock.advance(5 * MICROS_PER_SEC);
        let expires_at = registry.grant("p1", "d1", 10).unwrap();

        // 5s in, re-granted for 10s: expiry is T0+15s, not T0+20s.
        assert_eq!(expires_at, T0 + 15 * MICROS_PER_SEC);
        assert_eq!(registry.expiry_of("p1", "d1").unwrap(), Some(expires_at));
    }

    #[test]
    fn regrant_revives_a_lapsed_pair() {
        let (registry, _, clock) = registry_with_trail();

        let first_expiry = registry.grant("p1", "d1", 1).unwrap();
        clock.set(first_expiry + 1);
        assert!(!registry.check("p1", "d1").unwrap());

        registry.grant("p1", "d1", 60).unwrap();
        assert!(registry.check("p1", "d1").unwrap());
    }

    #[test]
    fn revoking_an_absent_grant_is_a_noop_but_still_audited() {
        let (registry, sink, _) = registry_with_trail();

        registry.revoke("p1", "d1").unwrap();
        registry.revoke("p1", "d1").unwrap();

        assert!(!registry.check("p1", "d1").unwrap());
        let trail = sink.events_for_subject("p1");
        assert_eq!(trail.len(), 2);
        assert!(trail
            .iter()
            .all(|event| event.kind == AuditKind::AccessRevoked));
    }

    #[test]
    fn validation_failures() {
        let (registry, sink, _) = registry_with_trail();

        assert_eq!(
            registry.grant("", "d1", 60),
            Err(RegistryError::InvalidInput { field: "subject" })
        );
        assert_eq!(
            registry.grant("p1", "", 60),
            Err(RegistryError::InvalidInput { field: "grantee" })
        );
        assert_eq!(
            registry.grant("p1", "d1", 0),
            Err(RegistryError::InvalidDuration { seconds: 0 })
        );
        assert_eq!(
            registry.grant("p1", "d1", -1),
            Err(RegistryError::InvalidDuration { seconds: -1 })
        );
        // Rejected operations leave no trace.
        assert!(sink.is_empty());
    }

    #[test]
    fn request_is_advisory_and_confers_nothing() {
        let (registry, sink, _) = registry_with_trail();

        registry.request("p1", "d1").unwrap();

        assert!(!registry.check("p1", "d1").unwrap());
        let trail = sink.events_for_subject("p1");
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].kind, AuditKind::AccessRequested);
        assert_eq!(trail[0].grantee, "d1");
    }

    #[test]
    fn pure_queries_emit_no_events() {
        let (registry, sink, _) = registry_with_trail();

        registry.grant("p1", "d1", 60).unwrap();
        let baseline = sink.len();

        registry.check("p1", "d1").unwrap();
        registry.expiry_of("p1", "d1").unwrap();
        registry.active_grants("p1");

        assert_eq!(sink.len(), baseline);
    }

    #[test]
    fn active_grants_filters_lapsed_and_foreign_entries() {
        let (registry, _, clock) = registry_with_trail();

        registry.grant("p1", "d1", 10).unwrap();
        registry.grant("p1", "d2", 100).unwrap();
        registry.grant("p2", "d3", 100).unwrap();

        clock.advance(20 * MICROS_PER_SEC);

        let active = registry.active_grants("p1");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].0, "d2");
    }

    #[test]
    fn grant_and_revoke_events_carry_matching_fields() {
        let (registry, sink, _) = registry_with_trail();

        let expires_at = registry.grant("p1", "d1", 60).unwrap();
        registry.revoke("p1", "d1").unwrap();

        let trail = sink.snapshot();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].kind, AuditKind::AccessGranted { expires_at });
        assert_eq!(trail[0].subject, "p1");
        assert_eq!(trail[0].grantee, "d1");
        assert_eq!(trail[1].kind, AuditKind::AccessRevoked);
    }
}
