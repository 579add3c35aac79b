//! Repository for the `member_tickets` table.

use festago_core::member_ticket::{EntryState, MemberTicket, NewMemberTicket};
use festago_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::member_ticket::MemberTicketRow;

/// Column list for `member_tickets` queries.
const COLUMNS: &str = "\
    id, owner_id, stage_id, ticket_id, number, entry_time, ticket_type, \
    entry_state, created_at, updated_at";

pub struct MemberTicketRepo;

impl MemberTicketRepo {
    /// Insert a freshly allocated reservation.
    ///
    /// `reserved_at` is stored as `created_at` so the row carries the same
    /// instant the domain used for the stage-start check.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewMemberTicket,
    ) -> Result<MemberTicket, sqlx::Error> {
        let query = format!(
            "INSERT INTO member_tickets \
                 (owner_id, stage_id, ticket_id, number, entry_time, ticket_type, \
                  entry_state, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MemberTicketRow>(&query)
            .bind(input.owner_id)
            .bind(input.stage_id)
            .bind(input.ticket_id)
            .bind(input.number)
            .bind(input.entry_time)
            .bind(input.ticket_type.as_str())
            .bind(input.entry_state.index())
            .bind(input.reserved_at)
            .fetch_one(conn)
            .await?
            .try_into()
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MemberTicket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM member_tickets WHERE id = $1");
        sqlx::query_as::<_, MemberTicketRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .map(MemberTicket::try_from)
            .transpose()
    }

    /// List a member's tickets, most recent reservation first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MemberTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM member_tickets \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MemberTicketRow>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(MemberTicket::try_from)
            .collect()
    }

    /// List a member's tickets whose entry time is after `after`, in entry
    /// time order.
    pub async fn list_by_owner_entering_after(
        pool: &PgPool,
        owner_id: DbId,
        after: Timestamp,
    ) -> Result<Vec<MemberTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM member_tickets \
             WHERE owner_id = $1 AND entry_time > $2 \
             ORDER BY entry_time ASC, id ASC"
        );
        sqlx::query_as::<_, MemberTicketRow>(&query)
            .bind(owner_id)
            .bind(after)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(MemberTicket::try_from)
            .collect()
    }

    /// Move a member ticket from `from` to `to`.
    ///
    /// Returns `false` when the stored state was no longer `from`, i.e. a
    /// concurrent transition won.
    pub async fn transition_entry_state(
        pool: &PgPool,
        id: DbId,
        from: EntryState,
        to: EntryState,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE member_tickets SET entry_state = $3, updated_at = NOW() \
             WHERE id = $1 AND entry_state = $2",
        )
        .bind(id)
        .bind(from.index())
        .bind(to.index())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
