//! Mock implementation of the Tongji open API for tests and local runs.
//!
//! Implements the token endpoint plus the five bearer-authenticated GET
//! endpoints. Application-level failures (bad or missing token) come back
//! as HTTP 200 with an error envelope, matching the real API; only a
//! broken exchange request gets an HTTP error status.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Envelope `code` for success; anything else means the call failed.
pub const SUCCESS_CODE: &str = "A00000";
/// Envelope `code` for a missing or unrecognized bearer token.
pub const INVALID_TOKEN_CODE: &str = "A30002";

/// Issued access tokens, shared across handlers.
pub type Tokens = Arc<RwLock<HashSet<String>>>;

#[derive(Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: String,
    pub code: String,
    pub redirect_uri: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

pub fn app() -> Router {
    let tokens: Tokens = Arc::new(RwLock::new(HashSet::new()));
    Router::new()
        .route("/v1/token", post(issue_token))
        .route("/v1/dc/user/student_info", get(student_info))
        .route(
            "/v1/rt/onetongji/school_calendar_current_term_calendar",
            get(school_calendar),
        )
        .route("/v1/rt/onetongji/undergraduate_score", get(undergraduate_score))
        .route("/v1/rt/onetongji/student_timetable", get(student_timetable))
        .route("/v1/rt/onetongji/student_exams", get(student_exams))
        .with_state(tokens)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn issue_token(
    State(tokens): State<Tokens>,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, StatusCode> {
    if request.grant_type != "authorization_code"
        || request.code.is_empty()
        || request.client_id.is_empty()
        || request.redirect_uri.is_empty()
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    let access_token = Uuid::new_v4().simple().to_string();
    tokens.write().await.insert(access_token.clone());

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: 3600,
    }))
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({"code": SUCCESS_CODE, "message": "success", "data": data}))
}

fn invalid_token() -> Json<Value> {
    Json(json!({"code": INVALID_TOKEN_CODE, "message": "invalid access token", "data": null}))
}

async fn authorized(tokens: &Tokens, headers: &HeaderMap) -> bool {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match token {
        Some(token) if !token.is_empty() => tokens.read().await.contains(token),
        _ => false,
    }
}

async fn student_info(State(tokens): State<Tokens>, headers: HeaderMap) -> Json<Value> {
    if !authorized(&tokens, &headers).await {
        return invalid_token();
    }
    envelope(json!([{
        "userId": "2254001",
        "name": "Test Student",
        "sexCode": "1",
        "deptName": "School of Software Engineering",
        "secondDeptName": "",
        "schoolName": "Tongji University",
        "currentGrade": "2022"
    }]))
}

async fn school_calendar(State(tokens): State<Tokens>, headers: HeaderMap) -> Json<Value> {
    if !authorized(&tokens, &headers).await {
        return invalid_token();
    }
    envelope(json!({
        "schoolCalendar": {"id": 119, "year": "2023-2024", "term": "2"},
        "simpleName": "2023-2024 term 2",
        "week": "12"
    }))
}

async fn undergraduate_score(
    State(tokens): State<Tokens>,
    headers: HeaderMap,
    Query(query): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&tokens, &headers).await {
        return Ok(invalid_token());
    }
    // The real endpoint refuses requests without a calendarId.
    if !query.contains_key("calendarId") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(envelope(json!({
        "averagePoint": "4.2",
        "totalCredit": "25.5",
        "term": [{
            "calendarId": 119,
            "creditInfo": [{"courseName": "Operating Systems", "credit": "4", "score": "92"}]
        }]
    })))
}

async fn student_timetable(State(tokens): State<Tokens>, headers: HeaderMap) -> Json<Value> {
    if !authorized(&tokens, &headers).await {
        return invalid_token();
    }
    envelope(json!([
        {
            "courseName": "Operating Systems",
            "teacherName": "Zhang",
            "timeTableList": [{"dayOfWeek": 1, "timeStart": 1, "timeEnd": 2, "roomLable": "JA101"}]
        },
        {
            "courseName": "Compilers",
            "teacherName": "Li",
            "timeTableList": [{"dayOfWeek": 3, "timeStart": 5, "timeEnd": 6, "roomLable": "JB202"}]
        }
    ]))
}

async fn student_exams(State(tokens): State<Tokens>, headers: HeaderMap) -> Json<Value> {
    if !authorized(&tokens, &headers).await {
        return invalid_token();
    }
    envelope(json!({
        "total": 1,
        "list": [{
            "courseName": "Operating Systems",
            "examSituation": "Final",
            "examTime": "2024-06-20 08:30-10:30",
            "examLocation": "JA101"
        }]
    }))
}
