//! Credential accessor port.
//!
//! # Design
//! Token storage is an injected capability: hosts implement `TokenStore`
//! over whatever they have (a browser's key-value store, a keychain, a
//! config file), and environments without any storage use `NoStorage`.
//! Reading is infallible: a missing token is a normal outcome, not an
//! error.
//!
//! This layer only ever reads the token. Writing it on login/logout is the
//! hosting application's job.

use std::sync::Mutex;

/// Key the hosting application conventionally stores the bearer token under
/// in its persistent key-value store.
pub const AUTH_TOKEN_KEY: &str = "authToken";

pub trait TokenStore: Send + Sync {
    /// Return the stored bearer token verbatim, if any.
    fn token(&self) -> Option<String>;
}

/// Store for environments with no persistent storage at all (server-side
/// rendering, batch tools). Always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl TokenStore for NoStorage {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Single-value in-memory store. The hosting application writes through
/// `set`/`clear`; the client only reads.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    pub fn set(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[cfg(test)]
mockall::mock! {
    pub TokenStore {}

    impl TokenStore for TokenStore {
        fn token(&self) -> Option<String>;
    }
}
