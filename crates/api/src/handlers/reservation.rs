//! Handler for reserving a ticket.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use festago_core::error::CoreError;
use festago_core::member_ticket::MemberTicket;
use festago_core::types::DbId;
use festago_db::repositories::TicketRepo;

use super::member_ticket::ensure_member;
use super::ticket::load_stage;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireMember;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tickets/{id}/reservations
///
/// Draws the next sequence number of the ticket for the calling member.
/// The number and its entry time are fixed for the life of the reservation.
pub async fn reserve(
    RequireMember(member): RequireMember,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<MemberTicket>>)> {
    let ticket = TicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: ticket_id,
        }))?;
    let stage = load_stage(&state, ticket.stage_id).await?;

    ensure_member(&state, &member).await?;

    let now = state.clock.now();
    let member_ticket = state
        .ledger
        .reserve(ticket_id, &stage, member.user_id, now)
        .await
        .inspect_err(|e| {
            tracing::debug!(
                ticket_id,
                member_id = member.user_id,
                error = %e,
                "Reservation rejected"
            );
        })?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: member_ticket,
        }),
    ))
}
