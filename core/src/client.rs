//! Stateless request builder and response parser for the Tongji open API.
//!
//! # Design
//! `TongjiClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an [`HttpRequest`] and a `parse_*` method that consumes an
//! [`HttpResponse`], keeping the I/O boundary explicit and the core
//! deterministic. The high-level [`crate::ApiClient`] composes these with
//! a token store and a transport.
//!
//! Every authenticated response is an envelope `{code, data}`; `code` must
//! equal [`SUCCESS_CODE`] exactly, and `data` is the payload. The bearer
//! token is attached as-is — an expired token goes out on the wire and the
//! failure comes back as an envelope error.

use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::token::{TokenData, TOKEN_VALIDITY_MARGIN_SECS};
use crate::types::{SchoolCalendar, StudentInfo};

pub const BASE_URL: &str = "https://api.tongji.edu.cn";
pub const CLIENT_ID: &str = "authorization-xxb-onedottongji-yuchen";
pub const OAUTH_REDIRECT_URL: &str = "onetj://fakeredir.gardilily.com";

/// Envelope `code` value marking a successful response.
pub const SUCCESS_CODE: &str = "A00000";

/// Permission scopes requested when sending the user to the login page.
/// The summarized-grades scope is granted but not consumed by any endpoint
/// here.
pub const OAUTH_SCOPES: [&str; 7] = [
    "dc_user_student_info",
    "rt_onetongji_cet_score",
    "rt_onetongji_school_calendar_current_term_calendar",
    "rt_onetongji_undergraduate_score",
    "rt_teaching_info_undergraduate_summarized_grades",
    "rt_onetongji_student_timetable",
    "rt_onetongji_student_exams",
];

/// Stateless client for the Tongji open API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct TongjiClient {
    base_url: String,
}

impl TongjiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// OAuth2 authorization-code exchange: `POST /v1/token` with a
    /// form-encoded body.
    pub fn build_token_exchange(&self, code: &str) -> HttpRequest {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("client_id", CLIENT_ID)
            .append_pair("code", code)
            .append_pair("redirect_uri", OAUTH_REDIRECT_URL)
            .finish();

        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/v1/token", self.base_url),
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(body),
        }
    }

    /// Parse the token-endpoint response taken at `now_epoch` seconds.
    ///
    /// Returns `None` when the body is absent or does not carry
    /// `access_token`/`expires_in` — the exchange simply failed, no
    /// session is touched. The stored expiry keeps the same safety margin
    /// the validity check applies: `now + expires_in - 10`.
    pub fn parse_token_exchange(
        &self,
        response: &HttpResponse,
        now_epoch: i64,
    ) -> Option<TokenData> {
        if response.body.is_empty() {
            return None;
        }
        let json: Value = serde_json::from_str(&response.body).ok()?;
        let token = json.get("access_token")?.as_str()?.to_string();
        let expires_in = json.get("expires_in")?.as_i64()?;

        Some(TokenData {
            token,
            expire_epoch_seconds: now_epoch + expires_in - TOKEN_VALIDITY_MARGIN_SECS,
        })
    }

    fn authorized_get(&self, token: &str, path_and_query: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path_and_query}", self.base_url),
            headers: vec![("Authorization".to_string(), format!("Bearer {token}"))],
            body: None,
        }
    }

    pub fn build_student_info(&self, token: &str) -> HttpRequest {
        self.authorized_get(token, "/v1/dc/user/student_info")
    }

    /// The endpoint responds with a one-element array; element 0 carries
    /// the record.
    pub fn parse_student_info(&self, response: &HttpResponse) -> Result<StudentInfo, ApiError> {
        let data = unwrap_envelope(response)?;
        StudentInfo::from_data(&data)
    }

    pub fn build_school_calendar(&self, token: &str) -> HttpRequest {
        self.authorized_get(token, "/v1/rt/onetongji/school_calendar_current_term_calendar")
    }

    pub fn parse_school_calendar(&self, response: &HttpResponse) -> Result<SchoolCalendar, ApiError> {
        let data = unwrap_envelope(response)?;
        SchoolCalendar::from_data(&data)
    }

    /// `calendarId=-1` asks for all terms; per-term filtering happens
    /// caller-side.
    pub fn build_undergraduate_score(&self, token: &str) -> HttpRequest {
        self.authorized_get(token, "/v1/rt/onetongji/undergraduate_score?calendarId=-1")
    }

    pub fn parse_undergraduate_score(&self, response: &HttpResponse) -> Result<Value, ApiError> {
        expect_object(unwrap_envelope(response)?, "undergraduate score")
    }

    pub fn build_student_timetable(&self, token: &str) -> HttpRequest {
        self.authorized_get(token, "/v1/rt/onetongji/student_timetable")
    }

    pub fn parse_student_timetable(&self, response: &HttpResponse) -> Result<Value, ApiError> {
        let data = unwrap_envelope(response)?;
        if !data.is_array() {
            return Err(ApiError::Decode(
                "student timetable: expected array".to_string(),
            ));
        }
        Ok(data)
    }

    pub fn build_student_exams(&self, token: &str) -> HttpRequest {
        self.authorized_get(token, "/v1/rt/onetongji/student_exams")
    }

    pub fn parse_student_exams(&self, response: &HttpResponse) -> Result<Value, ApiError> {
        expect_object(unwrap_envelope(response)?, "student exams")
    }
}

/// Validate the `{code, data}` envelope and hand back `data`.
///
/// Everything that can go wrong here counts as a session error: no body,
/// a non-JSON body, a missing or non-success `code`.
pub fn unwrap_envelope(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.body.is_empty() {
        return Err(ApiError::MissingBody);
    }

    let json: Value = serde_json::from_str(&response.body).map_err(|_| ApiError::MalformedBody {
        status: response.status,
    })?;

    match json.get("code").and_then(Value::as_str) {
        Some(SUCCESS_CODE) => Ok(json.get("data").cloned().unwrap_or(Value::Null)),
        Some(code) => Err(ApiError::Api {
            code: Some(code.to_string()),
        }),
        None => Err(ApiError::Api { code: None }),
    }
}

fn expect_object(data: Value, what: &str) -> Result<Value, ApiError> {
    if !data.is_object() {
        return Err(ApiError::Decode(format!("{what}: expected object")));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> TongjiClient {
        TongjiClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_token_exchange_produces_form_post() {
        let req = client().build_token_exchange("abc123");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/v1/token");
        assert_eq!(
            req.headers,
            vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )]
        );
        let body = req.body.unwrap();
        assert!(body.contains("grant_type=authorization_code"), "{body}");
        assert!(body.contains("code=abc123"), "{body}");
        assert!(body.contains("client_id="), "{body}");
        // redirect URI must be percent-encoded in a form body
        assert!(body.contains("redirect_uri=onetj%3A%2F%2F"), "{body}");
    }

    #[test]
    fn parse_token_exchange_applies_safety_margin() {
        let now = 1_700_000_000;
        let resp = response(200, r#"{"access_token":"T","expires_in":3600}"#);
        let data = client().parse_token_exchange(&resp, now).unwrap();
        assert_eq!(data.token, "T");
        assert_eq!(data.expire_epoch_seconds, now + 3600 - 10);
    }

    #[test]
    fn parse_token_exchange_rejects_missing_or_garbage_body() {
        let c = client();
        assert!(c.parse_token_exchange(&response(200, ""), 0).is_none());
        assert!(c.parse_token_exchange(&response(200, "not json"), 0).is_none());
        assert!(c
            .parse_token_exchange(&response(200, r#"{"access_token":"T"}"#), 0)
            .is_none());
        assert!(c
            .parse_token_exchange(&response(200, r#"{"expires_in":3600}"#), 0)
            .is_none());
    }

    #[test]
    fn authorized_requests_carry_bearer_header() {
        let req = client().build_student_info("tok");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/v1/dc/user/student_info");
        assert_eq!(
            req.headers,
            vec![("Authorization".to_string(), "Bearer tok".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_undergraduate_score_pins_calendar_id() {
        let req = client().build_undergraduate_score("tok");
        assert_eq!(
            req.url,
            "http://localhost:3000/v1/rt/onetongji/undergraduate_score?calendarId=-1"
        );
    }

    #[test]
    fn build_remaining_endpoints_hit_fixed_paths() {
        let c = client();
        assert_eq!(
            c.build_school_calendar("t").url,
            "http://localhost:3000/v1/rt/onetongji/school_calendar_current_term_calendar"
        );
        assert_eq!(
            c.build_student_timetable("t").url,
            "http://localhost:3000/v1/rt/onetongji/student_timetable"
        );
        assert_eq!(
            c.build_student_exams("t").url,
            "http://localhost:3000/v1/rt/onetongji/student_exams"
        );
    }

    #[test]
    fn unwrap_envelope_returns_data_on_success() {
        let resp = response(200, r#"{"code":"A00000","data":{"k":"v"}}"#);
        assert_eq!(unwrap_envelope(&resp).unwrap(), json!({"k":"v"}));
    }

    #[test]
    fn unwrap_envelope_flags_missing_body() {
        let err = unwrap_envelope(&response(200, "")).unwrap_err();
        assert!(matches!(err, ApiError::MissingBody));
    }

    #[test]
    fn unwrap_envelope_flags_malformed_body_with_status() {
        let err = unwrap_envelope(&response(502, "<html>bad gateway</html>")).unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody { status: 502 }));
    }

    #[test]
    fn unwrap_envelope_flags_error_code() {
        let err = unwrap_envelope(&response(200, r#"{"code":"A30002","data":null}"#)).unwrap_err();
        match err {
            ApiError::Api { code } => assert_eq!(code.as_deref(), Some("A30002")),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn unwrap_envelope_flags_absent_code() {
        let err = unwrap_envelope(&response(200, r#"{"data":{}}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Api { code: None }));
    }

    #[test]
    fn parse_student_timetable_requires_array() {
        let c = client();
        let ok = response(200, r#"{"code":"A00000","data":[{"lesson":1}]}"#);
        assert!(c.parse_student_timetable(&ok).unwrap().is_array());

        let bad = response(200, r#"{"code":"A00000","data":{"lesson":1}}"#);
        assert!(matches!(
            c.parse_student_timetable(&bad).unwrap_err(),
            ApiError::Decode(_)
        ));
    }

    #[test]
    fn parse_undergraduate_score_requires_object() {
        let c = client();
        let bad = response(200, r#"{"code":"A00000","data":[1,2]}"#);
        assert!(matches!(
            c.parse_undergraduate_score(&bad).unwrap_err(),
            ApiError::Decode(_)
        ));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = TongjiClient::new("http://localhost:3000/");
        assert_eq!(
            c.build_student_exams("t").url,
            "http://localhost:3000/v1/rt/onetongji/student_exams"
        );
    }
}
