//! Authenticated client for the Tongji university open API.
//!
//! # Overview
//! Handles the OAuth2 authorization-code exchange, caches the resulting
//! bearer token, and exposes the handful of GET endpoints the API offers
//! (student info, school calendar, undergraduate score, timetable, exams).
//! Responses arrive in a uniform `{code, data}` envelope; `code` must be
//! the literal `"A00000"`.
//!
//! # Design
//! - `TongjiClient` is stateless — each endpoint is a `build_*`/`parse_*`
//!   pair, so the I/O boundary is explicit and unit-testable.
//! - `ApiClient` composes that with an injected [`TokenStore`] and
//!   [`HttpTransport`]; construct one per process and pass it around, no
//!   global instance.
//! - Any failure other than a transport error counts as a session error:
//!   the cached token is cleared and the caller gets a typed [`ApiError`].
//! - UI side effects (alerts, navigate-to-login) live behind
//!   [`UiNotifier`] in the [`ui`] adapter, not in the client itself.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod token;
pub mod types;
pub mod ui;

pub use api::ApiClient;
pub use client::{TongjiClient, BASE_URL, CLIENT_ID, OAUTH_REDIRECT_URL, OAUTH_SCOPES, SUCCESS_CODE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use token::{MemoryTokenStore, TokenData, TokenStore, TOKEN_VALIDITY_MARGIN_SECS};
pub use types::{Gender, SchoolCalendar, StudentInfo};
pub use ui::{ErrorPresenter, UiNotifier};
