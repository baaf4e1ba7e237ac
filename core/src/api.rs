//! High-level authenticated client: token store + transport + endpoints.
//!
//! # Design
//! `ApiClient` is constructed once per process and handed to consumers
//! explicitly — there is no global instance. It wires a [`TongjiClient`]
//! to an injected [`TokenStore`] and [`HttpTransport`], and owns the one
//! piece of session policy this component has: any session error clears
//! the cached token before the error is returned, so the next caller sees
//! the UNAUTHENTICATED state. Transport errors never touch the token.
//!
//! Calls block the invoking thread; UI concerns live in [`crate::ui`].

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{TongjiClient, BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::token::TokenStore;
use crate::types::{SchoolCalendar, StudentInfo};

pub struct ApiClient {
    client: TongjiClient,
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Client against the production base URL.
    pub fn new(store: Arc<dyn TokenStore>, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_base_url(BASE_URL, store, transport)
    }

    /// Client against an arbitrary base URL (tests, staging).
    pub fn with_base_url(
        base_url: &str,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            client: TongjiClient::new(base_url),
            store,
            transport,
        }
    }

    /// True iff a token is stored and its expiry clears the safety margin.
    pub fn is_token_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        self.store
            .token_data()
            .is_some_and(|data| data.is_valid_at(now))
    }

    /// Drop the cached token. Safe to call when none is stored.
    pub fn clear_session(&self) {
        self.store.clear_token_data();
    }

    /// Persisted flag toggled by the host's account-switch flow; this
    /// client only stores it.
    pub fn switch_account_required(&self) -> bool {
        self.store.switch_account_required()
    }

    pub fn set_switch_account_required(&self, required: bool) {
        self.store.set_switch_account_required(required);
    }

    /// Exchange an OAuth2 authorization code for an access token.
    ///
    /// `Ok(true)` means a token was stored. `Ok(false)` means the token
    /// endpoint answered but the response was missing or unparseable — no
    /// session state changes and no UI is involved. Network failures
    /// propagate as `Err(Transport)` for the caller to decide.
    pub fn exchange_code_for_token(&self, code: &str) -> Result<bool, ApiError> {
        let request = self.client.build_token_exchange(code);
        let response = self.dispatch(&request)?;

        match self
            .client
            .parse_token_exchange(&response, Utc::now().timestamp())
        {
            Some(data) => {
                debug!(expire = data.expire_epoch_seconds, "storing access token");
                self.store.store_token_data(&data);
                Ok(true)
            }
            None => {
                warn!("token exchange response missing or unparseable");
                Ok(false)
            }
        }
    }

    pub fn get_student_info(&self) -> Result<StudentInfo, ApiError> {
        let request = self.client.build_student_info(&self.bearer());
        let response = self.guard(self.dispatch(&request))?;
        self.guard(self.client.parse_student_info(&response))
    }

    pub fn get_school_calendar(&self) -> Result<SchoolCalendar, ApiError> {
        let request = self.client.build_school_calendar(&self.bearer());
        let response = self.guard(self.dispatch(&request))?;
        self.guard(self.client.parse_school_calendar(&response))
    }

    /// Raw score data; the schema is not pinned down by this client.
    pub fn get_undergraduate_score(&self) -> Result<Value, ApiError> {
        let request = self.client.build_undergraduate_score(&self.bearer());
        let response = self.guard(self.dispatch(&request))?;
        self.guard(self.client.parse_undergraduate_score(&response))
    }

    pub fn get_student_timetable(&self) -> Result<Value, ApiError> {
        let request = self.client.build_student_timetable(&self.bearer());
        let response = self.guard(self.dispatch(&request))?;
        self.guard(self.client.parse_student_timetable(&response))
    }

    pub fn get_student_exams(&self) -> Result<Value, ApiError> {
        let request = self.client.build_student_exams(&self.bearer());
        let response = self.guard(self.dispatch(&request))?;
        self.guard(self.client.parse_student_exams(&response))
    }

    /// Current token, or empty when none is stored. Validity is not
    /// pre-checked — an expired token is sent as-is and the server's
    /// envelope error drives the session-error path.
    fn bearer(&self) -> String {
        self.store
            .token_data()
            .map(|data| data.token)
            .unwrap_or_default()
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(url = %request.url, "executing request");
        self.transport.execute(request).map_err(ApiError::from)
    }

    /// Clear the cached token on any session error before handing the
    /// result back.
    fn guard<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(err) = &result {
            if err.is_session_error() {
                warn!(error = %err, "session error, clearing cached token");
                self.store.clear_token_data();
            }
        }
        result
    }
}
