//! Error types for the university API client.
//!
//! # Design
//! The taxonomy mirrors how the remote API actually fails: transport
//! problems are transient and keep the session alive, while everything
//! else — missing body, unparseable JSON, a non-success envelope code, a
//! shape mismatch — is treated as "credentials invalid" and forces a
//! re-login. `is_session_error` encodes that split so the high-level
//! client and the UI adapter never hard-code variant lists.

use std::fmt;

use crate::http::TransportError;

/// Errors returned by client operations.
#[derive(Debug)]
pub enum ApiError {
    /// The HTTP round-trip itself failed (connectivity, DNS, I/O).
    Transport(String),

    /// The server responded without a body.
    MissingBody,

    /// The response body was not valid JSON. Carries the HTTP status so
    /// the diagnostic shown to the user names it.
    MalformedBody { status: u16 },

    /// The envelope `code` was not the success literal, or the field was
    /// absent entirely.
    Api { code: Option<String> },

    /// The envelope was well-formed but `data` did not have the shape the
    /// endpoint promises.
    Decode(String),
}

impl ApiError {
    /// True for every failure that invalidates the cached token.
    ///
    /// The remote API gives no way to tell an expired token from a
    /// business-level error, so both force re-authentication. Transport
    /// failures are the only exception.
    pub fn is_session_error(&self) -> bool {
        !matches!(self, ApiError::Transport(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "network error: {msg}"),
            ApiError::MissingBody => write!(f, "response had no body"),
            ApiError::MalformedBody { status } => {
                write!(f, "response body was not JSON (HTTP {status})")
            }
            ApiError::Api { code: Some(code) } => write!(f, "API error code {code}"),
            ApiError::Api { code: None } => write!(f, "API response missing result code"),
            ApiError::Decode(msg) => write!(f, "unexpected response shape: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_is_not_a_session_error() {
        assert!(!ApiError::Transport("refused".to_string()).is_session_error());
    }

    #[test]
    fn everything_else_is_a_session_error() {
        assert!(ApiError::MissingBody.is_session_error());
        assert!(ApiError::MalformedBody { status: 502 }.is_session_error());
        assert!(ApiError::Api {
            code: Some("A30002".to_string())
        }
        .is_session_error());
        assert!(ApiError::Api { code: None }.is_session_error());
        assert!(ApiError::Decode("expected array".to_string()).is_session_error());
    }

    #[test]
    fn malformed_body_display_names_http_status() {
        let msg = ApiError::MalformedBody { status: 404 }.to_string();
        assert!(msg.contains("404"), "{msg}");
    }
}
