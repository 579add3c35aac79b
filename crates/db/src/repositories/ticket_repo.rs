//! Repository for the `tickets` and `ticket_entry_times` tables.
//!
//! Tickets are always loaded with their entry-time slots so the aggregate
//! is complete. Methods taking `&mut PgConnection` are meant to be called
//! inside a transaction that already holds the ticket row lock.

use festago_core::ticket::{EntryTimeSlot, Ticket};
use festago_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::ticket::{CreateTicket, EntryTimeRow, TicketRow};

/// Column list for `tickets` queries.
const COLUMNS: &str = "\
    id, stage_id, school_id, ticket_type, total_amount, reserved_amount, \
    created_at, updated_at";

/// Column list for `ticket_entry_times` queries.
const ENTRY_TIME_COLUMNS: &str = "id, ticket_id, entry_time, amount, created_at";

pub struct TicketRepo;

impl TicketRepo {
    /// Return the ticket for (stage, ticket type), creating an empty one
    /// if none exists yet.
    pub async fn find_or_create(
        pool: &PgPool,
        input: &CreateTicket,
    ) -> Result<Ticket, sqlx::Error> {
        let mut conn = pool.acquire().await?;

        sqlx::query(
            "INSERT INTO tickets (stage_id, school_id, ticket_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (stage_id, ticket_type) DO NOTHING",
        )
        .bind(input.stage_id)
        .bind(input.school_id)
        .bind(input.ticket_type.as_str())
        .execute(&mut *conn)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE stage_id = $1 AND ticket_type = $2"
        );
        let row = sqlx::query_as::<_, TicketRow>(&query)
            .bind(input.stage_id)
            .bind(input.ticket_type.as_str())
            .fetch_one(&mut *conn)
            .await?;

        let slots = Self::list_entry_times(&mut *conn, row.id).await?;
        row.into_domain(slots)
    }

    /// Load a ticket with its slots.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::load(&mut conn, id, false).await
    }

    /// Load a ticket with its slots, locking the `tickets` row until the
    /// surrounding transaction ends.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        Self::load(conn, id, true).await
    }

    /// List the ticket rows of a stage, ordered by id.
    pub async fn list_by_stage(
        pool: &PgPool,
        stage_id: DbId,
    ) -> Result<Vec<TicketRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE stage_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, TicketRow>(&query)
            .bind(stage_id)
            .fetch_all(pool)
            .await
    }

    /// Insert one entry-time slot row.
    pub async fn insert_entry_time(
        conn: &mut PgConnection,
        ticket_id: DbId,
        slot: &EntryTimeSlot,
    ) -> Result<EntryTimeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_entry_times (ticket_id, entry_time, amount) \
             VALUES ($1, $2, $3) \
             RETURNING {ENTRY_TIME_COLUMNS}"
        );
        sqlx::query_as::<_, EntryTimeRow>(&query)
            .bind(ticket_id)
            .bind(slot.entry_time)
            .bind(slot.amount)
            .fetch_one(conn)
            .await
    }

    /// Persist the ticket's current total and reserved amounts.
    pub async fn update_amounts(
        conn: &mut PgConnection,
        ticket: &Ticket,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tickets \
             SET total_amount = $2, reserved_amount = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(ticket.id)
        .bind(ticket.amount().total_amount())
        .bind(ticket.amount().reserved_amount())
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn load(
        conn: &mut PgConnection,
        id: DbId,
        for_update: bool,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1{lock}");
        let Some(row) = sqlx::query_as::<_, TicketRow>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let slots = Self::list_entry_times(conn, row.id).await?;
        row.into_domain(slots).map(Some)
    }

    async fn list_entry_times(
        conn: &mut PgConnection,
        ticket_id: DbId,
    ) -> Result<Vec<EntryTimeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_TIME_COLUMNS} FROM ticket_entry_times \
             WHERE ticket_id = $1 ORDER BY entry_time ASC, id ASC"
        );
        sqlx::query_as::<_, EntryTimeRow>(&query)
            .bind(ticket_id)
            .fetch_all(conn)
            .await
    }
}
