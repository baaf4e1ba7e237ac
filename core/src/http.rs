//! HTTP transport boundary types.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and parses `HttpResponse` values without ever touching the
//! network — the actual round-trip runs behind the [`HttpTransport`] trait,
//! so tests and hosts can plug in whatever HTTP stack they already carry.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross thread
//! and host boundaries without lifetime concerns.

use std::fmt;

/// HTTP method for a request. The university API only uses these two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// Built by `TongjiClient::build_*` methods and executed by an
/// [`HttpTransport`] implementation.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `TongjiClient::parse_*` methods. An empty `body` is treated
/// as "no body" by the envelope parser.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// A network-level failure: connectivity loss, DNS, I/O.
///
/// Distinct from [`crate::ApiError`] session errors — a transport failure
/// never invalidates the cached token.
#[derive(Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Executes one HTTP round-trip, blocking the calling thread.
///
/// Implementations carry no timeout, retry, or cancellation policy of this
/// crate's making; a hung call blocks until the underlying stack gives up.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
