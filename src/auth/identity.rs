//! Caller identity types.
//!
//! Authentication itself is delegated to an external identity service; the
//! client only ever sees an opaque principal and the token that proves it.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Opaque reference to an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(text: impl Into<String>) -> Self {
        Principal(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(text: &str) -> Self {
        Principal(text.to_string())
    }
}

/// Capability supplying the current caller, if any. Absence means
/// unauthenticated; caller-scoped reads are suppressed rather than failed.
pub trait IdentityProvider {
    fn current(&self) -> Option<Principal>;
}

impl<T: IdentityProvider> IdentityProvider for Arc<T> {
    fn current(&self) -> Option<Principal> {
        (**self).current()
    }
}

/// In-memory identity source for embedders that run their own login flow,
/// and for tests.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    current: Mutex<Option<Principal>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, principal: Principal) {
        *self.lock() = Some(principal);
    }

    pub fn logout(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Principal>> {
        // Recover from poisoning; the stored value is a plain Option.
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IdentityProvider for MemoryIdentity {
    fn current(&self) -> Option<Principal> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_identity_switching() {
        let identity = MemoryIdentity::new();
        assert_eq!(identity.current(), None);

        identity.login(Principal::new("alice"));
        assert_eq!(identity.current(), Some(Principal::new("alice")));

        identity.logout();
        assert_eq!(identity.current(), None);
    }

    #[test]
    fn test_principal_serializes_transparently() {
        let principal = Principal::new("w7x-principal");
        assert_eq!(
            serde_json::to_string(&principal).unwrap(),
            "\"w7x-principal\""
        );
    }
}
