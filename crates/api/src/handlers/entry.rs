//! Gate-side entry-code validation.

use axum::extract::State;
use axum::Json;
use festago_core::error::{CoreError, TicketError};
use festago_core::member_ticket::EntryState;
use festago_core::types::DbId;
use festago_db::repositories::MemberTicketRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateEntryCodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct EntryValidationResponse {
    pub member_ticket_id: DbId,
    pub entry_state: EntryState,
}

/// POST /api/v1/staff/entry-codes/validation
///
/// Admits the holder of `code`. The state embedded in the code is not
/// trusted; the live member ticket decides.
pub async fn validate(
    RequireAdmin(staff): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ValidateEntryCodeRequest>,
) -> AppResult<Json<DataResponse<EntryValidationResponse>>> {
    let now = state.clock.now();
    let payload = state.entry_codes.decode(&input.code, now)?;

    let mut member_ticket = MemberTicketRepo::find_by_id(&state.pool, payload.member_ticket_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MemberTicket",
            id: payload.member_ticket_id,
        }))?;

    let previous = member_ticket.entry_state;
    member_ticket.mark_entried()?;

    let moved = MemberTicketRepo::transition_entry_state(
        &state.pool,
        member_ticket.id,
        previous,
        member_ticket.entry_state,
    )
    .await?;
    if !moved {
        // Another gate admitted the same ticket between load and update.
        return Err(TicketError::DoubleEntry.into());
    }

    tracing::info!(
        member_ticket_id = member_ticket.id,
        staff_id = staff.user_id,
        "Member ticket entered"
    );

    Ok(Json(DataResponse {
        data: EntryValidationResponse {
            member_ticket_id: member_ticket.id,
            entry_state: member_ticket.entry_state,
        },
    }))
}
