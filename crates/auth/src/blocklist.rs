//! Token revocation blocklist.
//!
//! Logout revokes the presented token by its `jti` until the token's natural
//! expiry. The trait is the seam for a shared store (e.g. Redis) in a
//! multi-instance deployment; the in-memory implementation is per-process.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Revocation store keyed by token `jti`.
pub trait TokenBlocklist: Send + Sync {
    /// Revoke a token id until `expires_at`; entries past their expiry may be
    /// dropped at any time.
    fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>);

    /// Whether the token id is currently revoked.
    fn is_revoked(&self, jti: &Uuid, now: DateTime<Utc>) -> bool;
}

/// In-process blocklist. Expired entries are swept lazily on writes.
#[derive(Debug, Default)]
pub struct InMemoryBlocklist {
    inner: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl InMemoryBlocklist {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenBlocklist for InMemoryBlocklist {
    fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        map.retain(|_, exp| *exp > now);
        map.insert(jti, expires_at);
    }

    fn is_revoked(&self, jti: &Uuid, now: DateTime<Utc>) -> bool {
        let map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.get(jti).is_some_and(|exp| *exp > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn revoked_jti_is_rejected_until_expiry() {
        let bl = InMemoryBlocklist::new();
        let jti = Uuid::new_v4();
        let now = Utc::now();

        assert!(!bl.is_revoked(&jti, now));
        bl.revoke(jti, now + Duration::seconds(60));
        assert!(bl.is_revoked(&jti, now));
        assert!(!bl.is_revoked(&jti, now + Duration::seconds(61)));
    }

    #[test]
    fn expired_entries_are_swept_on_write() {
        let bl = InMemoryBlocklist::new();
        let old = Uuid::new_v4();
        bl.revoke(old, Utc::now() - Duration::seconds(1));
        bl.revoke(Uuid::new_v4(), Utc::now() + Duration::seconds(60));
        assert!(!bl.is_revoked(&old, Utc::now()));
    }
}
