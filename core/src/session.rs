//! Startup login-state snapshot.
//!
//! The UI reads a single boolean: "was the user logged in when the app
//! started". It is captured once from the token store and never updated by
//! the auth wrappers; a later `login` or `register` call does not flip it.
//! Hosts that need live state derive it from their `TokenStore` on demand
//! (`store.token().is_some()`) instead of holding a snapshot.

use crate::token::TokenStore;

/// Whether a token was present in storage at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginState {
    logged_in: bool,
}

impl LoginState {
    /// Capture the current presence of a token. With `NoStorage` this is
    /// always logged-out.
    pub fn at_startup(store: &dyn TokenStore) -> Self {
        Self {
            logged_in: store.token().is_some(),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{MemoryTokenStore, NoStorage};

    #[test]
    fn logged_in_iff_token_present_at_startup() {
        let store = MemoryTokenStore::with_token("t1");
        assert!(LoginState::at_startup(&store).is_logged_in());

        let empty = MemoryTokenStore::new();
        assert!(!LoginState::at_startup(&empty).is_logged_in());
    }

    #[test]
    fn no_storage_means_logged_out() {
        assert!(!LoginState::at_startup(&NoStorage).is_logged_in());
    }

    #[test]
    fn snapshot_ignores_later_store_changes() {
        let store = MemoryTokenStore::new();
        let state = LoginState::at_startup(&store);
        store.set("fresh-token");
        assert!(!state.is_logged_in());

        let logged_in = LoginState::at_startup(&store);
        store.clear();
        assert!(logged_in.is_logged_in());
    }
}
