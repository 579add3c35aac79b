//! PostgreSQL-backed [`CapacityLedger`].
//!
//! Each operation runs in its own transaction and starts by locking the
//! ticket row with `SELECT ... FOR UPDATE`. Everything that depends on the
//! reserved counter happens under that lock, so concurrent reservations of
//! one ticket queue up while other tickets proceed independently.

use async_trait::async_trait;
use chrono::SubsecRound;
use festago_core::ledger::{CapacityLedger, LedgerError};
use festago_core::member_ticket::MemberTicket;
use festago_core::stage::Stage;
use festago_core::ticket::{EntryTimeSlot, Ticket};
use festago_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::repositories::{MemberTicketRepo, TicketRepo};

fn storage(err: sqlx::Error) -> LedgerError {
    LedgerError::Storage(Box::new(err))
}

#[derive(Debug, Clone)]
pub struct PgCapacityLedger {
    pool: PgPool,
}

impl PgCapacityLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CapacityLedger for PgCapacityLedger {
    async fn add_entry_time_slot(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        current_time: Timestamp,
        entry_time: Timestamp,
        amount: i32,
    ) -> Result<Ticket, LedgerError> {
        // TIMESTAMPTZ keeps microseconds; validate the value that gets stored.
        let entry_time = entry_time.trunc_subsecs(6);
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let mut ticket = TicketRepo::find_by_id_for_update(&mut *tx, ticket_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::TicketNotFound(ticket_id))?;

        // Dropping `tx` on an early return rolls the transaction back.
        ticket.add_entry_time_slot(stage, current_time, entry_time, amount)?;

        TicketRepo::insert_entry_time(&mut *tx, ticket_id, &EntryTimeSlot { entry_time, amount })
            .await
            .map_err(storage)?;
        TicketRepo::update_amounts(&mut *tx, &ticket)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            ticket_id,
            %entry_time,
            amount,
            total_amount = ticket.amount().total_amount(),
            "Added entry time slot"
        );
        Ok(ticket)
    }

    async fn reserve(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        owner_id: DbId,
        current_time: Timestamp,
    ) -> Result<MemberTicket, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let mut ticket = TicketRepo::find_by_id_for_update(&mut *tx, ticket_id)
            .await
            .map_err(storage)?
            .ok_or(LedgerError::TicketNotFound(ticket_id))?;

        let new_member_ticket = ticket.reserve(stage, owner_id, current_time)?;

        let member_ticket = MemberTicketRepo::insert(&mut *tx, &new_member_ticket)
            .await
            .map_err(storage)?;
        TicketRepo::update_amounts(&mut *tx, &ticket)
            .await
            .map_err(storage)?;
        tx.commit().await.map_err(storage)?;

        tracing::info!(
            ticket_id,
            owner_id,
            member_ticket_id = member_ticket.id,
            number = member_ticket.number,
            entry_time = %member_ticket.entry_time,
            "Reserved ticket"
        );
        Ok(member_ticket)
    }
}
