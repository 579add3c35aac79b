//! Repository for the `members` table.

use festago_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member};

/// Column list for `members` queries.
const COLUMNS: &str = "id, nickname, created_at, updated_at";

pub struct MemberRepo;

impl MemberRepo {
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!("INSERT INTO members (nickname) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.nickname)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
