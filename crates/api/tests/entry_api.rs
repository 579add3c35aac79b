//! HTTP-level tests for entry-code issuance and gate validation.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    add_slot, admin_token, base_time, body_json, build_test_app_with_clock, member_token,
    post_json_auth, reserve, seed_member, seed_stage, stage_start, ticket_open_time,
    TEST_ENTRY_CODE_PERIOD_SECS,
};
use festago_core::clock::FixedClock;
use festago_core::entry_code::{EntryCodeCodec, EntryCodePayload};
use festago_core::member_ticket::EntryState;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Reserved {
    clock: Arc<FixedClock>,
    owner: i64,
    member_ticket_id: i64,
}

/// Reserve one ticket entering one hour before the stage start.
async fn reserved_ticket(pool: &PgPool) -> Reserved {
    let clock = Arc::new(FixedClock::new(base_time()));
    let stage_id = seed_stage(pool).await;
    let ticket = body_json(add_slot(pool, &clock, stage_id, "STUDENT", 1, 10).await).await;
    let ticket_id = ticket["data"]["id"].as_i64().unwrap();

    clock.set(ticket_open_time() + Duration::hours(1));
    let owner = seed_member(pool, "owner").await;
    let reserved = body_json(reserve(pool, &clock, ticket_id, owner).await).await;

    Reserved {
        clock,
        owner,
        member_ticket_id: reserved["data"]["id"].as_i64().unwrap(),
    }
}

fn entry_time() -> chrono::DateTime<chrono::Utc> {
    stage_start() - Duration::hours(1)
}

async fn issue_code(
    pool: &PgPool,
    reserved: &Reserved,
    member_id: i64,
) -> axum::response::Response {
    let app = build_test_app_with_clock(pool.clone(), Arc::clone(&reserved.clock));
    post_json_auth(
        app,
        &format!("/api/v1/member-tickets/{}/entry-code", reserved.member_ticket_id),
        serde_json::json!({}),
        &member_token(member_id),
    )
    .await
}

async fn validate_code(
    pool: &PgPool,
    clock: &Arc<FixedClock>,
    code: &str,
    token: &str,
) -> axum::response::Response {
    let app = build_test_app_with_clock(pool.clone(), Arc::clone(clock));
    post_json_auth(
        app,
        "/api/v1/staff/entry-codes/validation",
        serde_json::json!({ "code": code }),
        token,
    )
    .await
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_code_is_only_issued_inside_entry_window(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;

    let early = issue_code(&pool, &reserved, reserved.owner).await;
    assert_eq!(early.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(early).await["code"], "NOT_ENTRY_TIME");

    reserved.clock.set(entry_time());
    let response = issue_code(&pool, &reserved, reserved.owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["code"].as_str().unwrap().split('.').count(), 3);
    assert_eq!(json["data"]["period"], TEST_ENTRY_CODE_PERIOD_SECS);

    reserved.clock.set(entry_time() + Duration::hours(24));
    let late = issue_code(&pool, &reserved, reserved.owner).await;
    assert_eq!(late.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_code_cannot_be_issued_for_someone_elses_ticket(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    let other = seed_member(&pool, "other").await;
    reserved.clock.set(entry_time());

    let response = issue_code(&pool, &reserved, other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_MEMBER_TICKET_OWNER");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gate_admits_once(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    reserved.clock.set(entry_time() + Duration::minutes(5));

    let issued = body_json(issue_code(&pool, &reserved, reserved.owner).await).await;
    let code = issued["data"]["code"].as_str().unwrap().to_string();

    reserved.clock.advance(Duration::seconds(10));
    let admitted = validate_code(&pool, &reserved.clock, &code, &admin_token()).await;
    assert_eq!(admitted.status(), StatusCode::OK);
    let json = body_json(admitted).await;
    assert_eq!(json["data"]["member_ticket_id"], reserved.member_ticket_id);
    assert_eq!(json["data"]["entry_state"], "ENTRIED");

    let again = validate_code(&pool, &reserved.clock, &code, &admin_token()).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "ALREADY_ENTRIED");

    // Used tickets no longer get codes.
    let reissue = issue_code(&pool, &reserved, reserved.owner).await;
    assert_eq!(reissue.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(reissue).await["code"], "NOT_ENTRY_TIME");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_code_is_rejected_without_entering(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    reserved.clock.set(entry_time());

    let issued = body_json(issue_code(&pool, &reserved, reserved.owner).await).await;
    let code = issued["data"]["code"].as_str().unwrap().to_string();

    reserved
        .clock
        .advance(Duration::seconds(TEST_ENTRY_CODE_PERIOD_SECS));
    let response = validate_code(&pool, &reserved.clock, &code, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "EXPIRED_ENTRY_CODE");

    let state: i16 = sqlx::query_scalar("SELECT entry_state FROM member_tickets WHERE id = $1")
        .bind(reserved.member_ticket_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(state, EntryState::BeforeEntry.index());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forged_or_garbage_codes_are_invalid(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    reserved.clock.set(entry_time());

    let now = entry_time();
    let forged = EntryCodeCodec::new("a-different-secret-entirely-for-forgery")
        .encode(
            EntryCodePayload {
                member_ticket_id: reserved.member_ticket_id,
                entry_state: EntryState::BeforeEntry,
            },
            now,
            now + Duration::seconds(30),
        )
        .unwrap();

    for code in [forged.as_str(), "not-a-code"] {
        let response = validate_code(&pool, &reserved.clock, code, &admin_token()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_ENTRY_CODE");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_code_for_unknown_member_ticket_returns_404(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    let now = entry_time();
    reserved.clock.set(now);

    let code = EntryCodeCodec::new(common::TEST_ENTRY_CODE_SECRET)
        .encode(
            EntryCodePayload {
                member_ticket_id: 999_999,
                entry_state: EntryState::BeforeEntry,
            },
            now,
            now + Duration::seconds(30),
        )
        .unwrap();

    let response = validate_code(&pool, &reserved.clock, &code, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_members_cannot_validate_codes(pool: PgPool) {
    let reserved = reserved_ticket(&pool).await;
    reserved.clock.set(entry_time());

    let issued = body_json(issue_code(&pool, &reserved, reserved.owner).await).await;
    let code = issued["data"]["code"].as_str().unwrap().to_string();

    let response =
        validate_code(&pool, &reserved.clock, &code, &member_token(reserved.owner)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
