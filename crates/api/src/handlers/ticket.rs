//! Handlers for ticket configuration and the public stage ticket listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use festago_core::error::CoreError;
use festago_core::stage::Stage;
use festago_core::ticket::{EntryTimeSlot, Ticket, TicketAmount, TicketType};
use festago_core::types::{DbId, Timestamp};
use festago_db::models::ticket::{CreateTicket, TicketRow};
use festago_db::repositories::{StageRepo, TicketRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /admin/tickets`: one entry-time slot for the ticket of
/// (`stage_id`, `ticket_type`), which is created on first use.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub stage_id: DbId,
    pub school_id: DbId,
    pub ticket_type: TicketType,
    pub amount: i32,
    pub entry_time: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: DbId,
    pub stage_id: DbId,
    pub ticket_type: TicketType,
    pub total_amount: i32,
    pub remaining_amount: i32,
    pub entry_times: Vec<EntryTimeSlot>,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            stage_id: ticket.stage_id,
            ticket_type: ticket.ticket_type,
            total_amount: ticket.amount().total_amount(),
            remaining_amount: ticket.amount().remaining_amount(),
            entry_times: ticket.slots().iter().copied().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StageTicketResponse {
    pub id: DbId,
    pub ticket_type: String,
    pub total_amount: i32,
    pub remaining_amount: i32,
}

impl From<TicketRow> for StageTicketResponse {
    fn from(row: TicketRow) -> Self {
        let amount = TicketAmount::from_parts(row.total_amount, row.reserved_amount);
        Self {
            id: row.id,
            ticket_type: row.ticket_type,
            total_amount: amount.total_amount(),
            remaining_amount: amount.remaining_amount(),
        }
    }
}

/// Resolve a stage by id, mapping absence to 404.
pub(crate) async fn load_stage(state: &AppState, stage_id: DbId) -> AppResult<Stage> {
    let row = StageRepo::find_by_id(&state.pool, stage_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Stage",
            id: stage_id,
        }))?;
    Ok(row.into_domain()?)
}

/// POST /api/v1/admin/tickets
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketResponse>>)> {
    let stage = load_stage(&state, input.stage_id).await?;

    let ticket = TicketRepo::find_or_create(
        &state.pool,
        &CreateTicket {
            stage_id: stage.id,
            school_id: input.school_id,
            ticket_type: input.ticket_type,
        },
    )
    .await?;

    let now = state.clock.now();
    let ticket = state
        .ledger
        .add_entry_time_slot(ticket.id, &stage, now, input.entry_time, input.amount)
        .await?;

    tracing::info!(
        admin_id = admin.user_id,
        ticket_id = ticket.id,
        stage_id = stage.id,
        ticket_type = ticket.ticket_type.as_str(),
        "Ticket slot configured"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: TicketResponse::from(&ticket),
        }),
    ))
}

/// GET /api/v1/stages/{id}/tickets
pub async fn list_by_stage(
    State(state): State<AppState>,
    Path(stage_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<StageTicketResponse>>>> {
    load_stage(&state, stage_id).await?;

    let tickets = TicketRepo::list_by_stage(&state.pool, stage_id)
        .await?
        .into_iter()
        .map(StageTicketResponse::from)
        .collect();
    Ok(Json(DataResponse { data: tickets }))
}
