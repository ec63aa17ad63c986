//! Error types for the Forked API client.
//!
//! # Design
//! The backend reports failures as JSON bodies with a human-readable
//! `message` field, and callers act on that text rather than on a status
//! taxonomy. `Api` therefore carries the normalized message (its `Display`)
//! plus the raw status code for logging. Serialization and deserialization
//! problems get their own variants so a payload that fails the typed
//! boundary is distinguishable from a backend rejection.

use thiserror::Error;

/// Errors returned by `ForkedClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` follows the
    /// backend's error body when one is present (see
    /// `client::error_message`).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The HTTP round-trip itself failed (connection refused, DNS, I/O).
    #[error("request failed: {0}")]
    Transport(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Status code of an `Api` error, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
