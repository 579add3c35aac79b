//! Handlers for a member's own tickets and entry-code issuance.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Duration;
use festago_core::entry_code::EntryCodePayload;
use festago_core::error::{CoreError, TicketError};
use festago_core::member_ticket::{self, MemberTicket, ENTRY_LIMIT_HOURS};
use festago_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use festago_core::types::DbId;
use festago_db::repositories::{MemberRepo, MemberTicketRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireMember;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EntryCodeResponse {
    pub code: String,
    /// Seconds the code stays valid.
    pub period: i64,
}

/// Fail with 404 when the token's member no longer exists.
pub(crate) async fn ensure_member(state: &AppState, member: &AuthUser) -> AppResult<()> {
    MemberRepo::find_by_id(&state.pool, member.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id: member.user_id,
        }))?;
    Ok(())
}

/// Load a member ticket and check it belongs to `member`.
async fn load_owned(state: &AppState, member: &AuthUser, id: DbId) -> AppResult<MemberTicket> {
    ensure_member(state, member).await?;
    let member_ticket = MemberTicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MemberTicket",
            id,
        }))?;
    if !member_ticket.is_owner(member.user_id) {
        return Err(TicketError::NotOwner.into());
    }
    Ok(member_ticket)
}

/// GET /api/v1/member-tickets
pub async fn list(
    RequireMember(member): RequireMember,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<MemberTicket>>>> {
    ensure_member(&state, &member).await?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let tickets =
        MemberTicketRepo::list_by_owner(&state.pool, member.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/member-tickets/current
///
/// Tickets the member can still use: enterable now first, then upcoming,
/// each group nearest entry time first. Paged after ordering.
pub async fn current(
    RequireMember(member): RequireMember,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<MemberTicket>>>> {
    ensure_member(&state, &member).await?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let now = state.clock.now();
    let candidates = MemberTicketRepo::list_by_owner_entering_after(
        &state.pool,
        member.user_id,
        now - Duration::hours(ENTRY_LIMIT_HOURS),
    )
    .await?;

    let page = member_ticket::select_current(candidates, now)
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/member-tickets/{id}
pub async fn get_by_id(
    RequireMember(member): RequireMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MemberTicket>>> {
    let member_ticket = load_owned(&state, &member, id).await?;
    Ok(Json(DataResponse {
        data: member_ticket,
    }))
}

/// POST /api/v1/member-tickets/{id}/entry-code
///
/// Issues a short-lived code for the gate. Only available inside the
/// ticket's entry window.
pub async fn issue_entry_code(
    RequireMember(member): RequireMember,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EntryCodeResponse>>> {
    let member_ticket = load_owned(&state, &member, id).await?;

    let now = state.clock.now();
    if !member_ticket.can_entry(now) {
        return Err(TicketError::NotEntryTime.into());
    }

    let period = state.config.entry_code.period_secs;
    let code = state.entry_codes.encode(
        EntryCodePayload::from(&member_ticket),
        now,
        now + Duration::seconds(period),
    )?;

    tracing::debug!(member_ticket_id = id, member_id = member.user_id, "Issued entry code");

    Ok(Json(DataResponse {
        data: EntryCodeResponse { code, period },
    }))
}
