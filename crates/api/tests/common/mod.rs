#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use festago_api::auth::jwt::{generate_access_token, JwtConfig};
use festago_api::config::{EntryCodeConfig, ServerConfig};
use festago_api::router::build_app_router;
use festago_api::state::AppState;
use festago_core::clock::{Clock, FixedClock, SystemClock};
use festago_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use festago_db::models::member::CreateMember;
use festago_db::models::stage::CreateStage;
use festago_db::repositories::{MemberRepo, StageRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough-for-hmac";
pub const TEST_ENTRY_CODE_SECRET: &str = "test-entry-code-secret-that-is-long-enough";
pub const TEST_ENTRY_CODE_PERIOD_SECS: i64 = 30;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        entry_code: EntryCodeConfig {
            secret: TEST_ENTRY_CODE_SECRET.to_string(),
            period_secs: TEST_ENTRY_CODE_PERIOD_SECS,
        },
    }
}

/// Build the full application router against `pool` using wall-clock time.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app(pool, Arc::new(SystemClock))
}

/// Build the full application router with a pinned clock.
pub fn build_test_app_with_clock(pool: PgPool, clock: Arc<FixedClock>) -> Router {
    build_app(pool, clock)
}

fn build_app(pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), clock);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

pub fn token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token(1, ROLE_ADMIN)
}

pub fn member_token(member_id: i64) -> String {
    token(member_id, ROLE_MEMBER)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The instant fixture clocks start at. Ticket sales open a day later and
/// the stage starts two days later.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 8, 10, 12, 0, 0).unwrap()
}

pub fn ticket_open_time() -> DateTime<Utc> {
    base_time() + Duration::days(1)
}

pub fn stage_start() -> DateTime<Utc> {
    base_time() + Duration::days(2)
}

pub async fn seed_stage(pool: &PgPool) -> i64 {
    StageRepo::create(
        pool,
        &CreateStage {
            festival_id: 1,
            line_up: Some("closing act".to_string()),
            start_time: stage_start(),
            ticket_open_time: ticket_open_time(),
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_member(pool: &PgPool, nickname: &str) -> i64 {
    MemberRepo::create(
        pool,
        &CreateMember {
            nickname: nickname.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn parse_time(value: &serde_json::Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Configure one slot of `amount` entering `hours_before_start` before the
/// stage start. The clock must be before ticket open.
pub async fn add_slot(
    pool: &PgPool,
    clock: &Arc<FixedClock>,
    stage_id: i64,
    ticket_type: &str,
    hours_before_start: i64,
    amount: i32,
) -> Response {
    let app = build_test_app_with_clock(pool.clone(), Arc::clone(clock));
    post_json_auth(
        app,
        "/api/v1/admin/tickets",
        serde_json::json!({
            "stage_id": stage_id,
            "school_id": 1,
            "ticket_type": ticket_type,
            "amount": amount,
            "entry_time": stage_start() - Duration::hours(hours_before_start),
        }),
        &admin_token(),
    )
    .await
}

pub async fn reserve(
    pool: &PgPool,
    clock: &Arc<FixedClock>,
    ticket_id: i64,
    member_id: i64,
) -> Response {
    let app = build_test_app_with_clock(pool.clone(), Arc::clone(clock));
    post_json_auth(
        app,
        &format!("/api/v1/tickets/{ticket_id}/reservations"),
        serde_json::json!({}),
        &member_token(member_id),
    )
    .await
}
