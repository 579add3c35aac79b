use festago_core::member_ticket::{EntryState, MemberTicket};
use festago_core::ticket::TicketType;
use festago_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::decode_error;

/// A row from the `member_tickets` table. `created_at` is the reservation time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberTicketRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub stage_id: DbId,
    pub ticket_id: DbId,
    pub number: i32,
    pub entry_time: Timestamp,
    pub ticket_type: String,
    pub entry_state: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<MemberTicketRow> for MemberTicket {
    type Error = sqlx::Error;

    fn try_from(row: MemberTicketRow) -> Result<Self, Self::Error> {
        let ticket_type = TicketType::parse(&row.ticket_type)
            .ok_or_else(|| decode_error(format!("unknown ticket_type '{}'", row.ticket_type)))?;
        let entry_state =
            EntryState::from_index(row.entry_state).map_err(|e| decode_error(e.to_string()))?;

        Ok(MemberTicket {
            id: row.id,
            owner_id: row.owner_id,
            stage_id: row.stage_id,
            ticket_id: row.ticket_id,
            number: row.number,
            entry_time: row.entry_time,
            ticket_type,
            entry_state,
            reserved_at: row.created_at,
        })
    }
}
