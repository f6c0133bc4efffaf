//! Error types for the posts API client.
//!
//! # Design
//! Three failure sources reach the caller unchanged: the transport (the
//! request never produced a response), the server (a response with a
//! non-success status), and the payload (a success response whose body does
//! not match the record shape). A 404 is a `Remote` error like any other
//! status; `is_not_found` exists for callers that branch on it.

use thiserror::Error;

/// Errors returned by `PostClient` parse methods and `AsyncPostClient`
/// operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout, or body-read failure before a full response was
    /// received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status other than the expected success.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("decode failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a `Remote` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
