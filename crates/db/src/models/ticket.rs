//! Ticket rows: the `tickets` table plus its `ticket_entry_times` slots.

use festago_core::ticket::{EntryTimeSlot, EntryTimeSlots, Ticket, TicketAmount, TicketType};
use festago_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::decode_error;

/// A row from the `tickets` table.
///
/// The amount columns are the persisted form of `TicketAmount`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketRow {
    pub id: DbId,
    pub stage_id: DbId,
    pub school_id: DbId,
    pub ticket_type: String,
    pub total_amount: i32,
    pub reserved_amount: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TicketRow {
    pub fn ticket_type(&self) -> Result<TicketType, sqlx::Error> {
        TicketType::parse(&self.ticket_type)
            .ok_or_else(|| decode_error(format!("unknown ticket_type '{}'", self.ticket_type)))
    }

    /// Assemble the aggregate from this row and its slot rows.
    pub fn into_domain(self, slots: Vec<EntryTimeRow>) -> Result<Ticket, sqlx::Error> {
        let ticket_type = self.ticket_type()?;
        Ok(Ticket::from_parts(
            self.id,
            self.stage_id,
            self.school_id,
            ticket_type,
            TicketAmount::from_parts(self.total_amount, self.reserved_amount),
            EntryTimeSlots::from_slots(slots.into_iter().map(EntryTimeSlot::from)),
        ))
    }
}

/// A row from the `ticket_entry_times` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EntryTimeRow {
    pub id: DbId,
    pub ticket_id: DbId,
    pub entry_time: Timestamp,
    pub amount: i32,
    pub created_at: Timestamp,
}

impl From<EntryTimeRow> for EntryTimeSlot {
    fn from(row: EntryTimeRow) -> Self {
        EntryTimeSlot {
            entry_time: row.entry_time,
            amount: row.amount,
        }
    }
}

/// DTO for the find-or-create step of ticket configuration.
#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub stage_id: DbId,
    pub school_id: DbId,
    pub ticket_type: TicketType,
}
