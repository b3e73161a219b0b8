//! Shared store for the current bearer token.

use std::fmt;
use std::sync::{Arc, RwLock};

use secrecy::SecretString;

/// Process-wide holder of the current bearer token.
///
/// The token is opaque at this layer: no validation, no expiry bookkeeping.
/// Writers overwrite atomically with respect to readers, and no history is
/// retained. Cloning the store yields another handle to the same token.
#[derive(Clone, Default)]
pub struct TokenStore {
    current: Arc<RwLock<Option<SecretString>>>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current token, if one has been set.
    pub fn get(&self) -> Option<SecretString> {
        self.current.read().unwrap().clone()
    }

    /// Overwrite the current token.
    pub fn set(&self, token: impl Into<String>) {
        *self.current.write().unwrap() = Some(SecretString::new(token.into().into()));
    }

    /// Clear the current token.
    pub fn reset(&self) {
        self.current.write().unwrap().take();
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.current.read().unwrap().is_some() {
            "Some(<redacted>)"
        } else {
            "None"
        };
        f.debug_struct("TokenStore").field("current", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_starts_empty() {
        let store = TokenStore::new();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let store = TokenStore::new();
        store.set("first");
        store.set("second");
        assert_eq!(store.get().unwrap().expose_secret(), "second");
    }

    #[test]
    fn test_reset_clears() {
        let store = TokenStore::new();
        store.set("anything");
        store.reset();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = TokenStore::new();
        let other = store.clone();
        store.set("shared");
        assert_eq!(other.get().unwrap().expose_secret(), "shared");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let store = TokenStore::new();
        store.set("super-secret-token");
        let rendered = format!("{:?}", store);
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("redacted"));
    }
}
