//! Repository for the `stages` table.
//!
//! Stage management is owned by the festival admin surface; ticketing only
//! needs to create stages for bootstrap and resolve them by id.

use festago_core::types::DbId;
use sqlx::PgPool;

use crate::models::stage::{CreateStage, StageRow};

/// Column list for `stages` queries.
const COLUMNS: &str = "\
    id, festival_id, line_up, start_time, ticket_open_time, created_at, updated_at";

pub struct StageRepo;

impl StageRepo {
    pub async fn create(pool: &PgPool, input: &CreateStage) -> Result<StageRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO stages (festival_id, line_up, start_time, ticket_open_time) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StageRow>(&query)
            .bind(input.festival_id)
            .bind(&input.line_up)
            .bind(input.start_time)
            .bind(input.ticket_open_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stages WHERE id = $1");
        sqlx::query_as::<_, StageRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
