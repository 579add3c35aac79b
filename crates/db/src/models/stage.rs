use festago_core::error::TicketError;
use festago_core::stage::Stage;
use festago_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `stages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StageRow {
    pub id: DbId,
    pub festival_id: DbId,
    pub line_up: Option<String>,
    pub start_time: Timestamp,
    pub ticket_open_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StageRow {
    pub fn into_domain(self) -> Result<Stage, TicketError> {
        Stage::new(
            self.id,
            self.festival_id,
            self.line_up,
            self.start_time,
            self.ticket_open_time,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStage {
    pub festival_id: DbId,
    pub line_up: Option<String>,
    pub start_time: Timestamp,
    pub ticket_open_time: Timestamp,
}
