//! Capacity ledger: the per-ticket serialisation point for capacity changes.
//!
//! Every mutation of a ticket's total or reserved amount goes through a
//! [`CapacityLedger`]. Implementations must guarantee that, for one ticket,
//! "check reserved < total, increment, resolve entry time, record the
//! reservation" is a single atomic step, and that operations on different
//! tickets do not block each other.
//!
//! - [`memory::InMemoryCapacityLedger`] -- single-node, mutex per ticket.
//! - `festago_db::ledger::PgCapacityLedger` -- row-locking transactions.

pub mod memory;

use async_trait::async_trait;

use crate::error::TicketError;
use crate::member_ticket::MemberTicket;
use crate::stage::Stage;
use crate::ticket::Ticket;
use crate::types::{DbId, Timestamp};

pub use memory::InMemoryCapacityLedger;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error("Ticket {0} not found")]
    TicketNotFound(DbId),

    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[async_trait]
pub trait CapacityLedger: Send + Sync {
    /// Append an entry-time slot to `ticket_id` and grow its capacity.
    ///
    /// Returns the updated ticket. On failure nothing is changed.
    async fn add_entry_time_slot(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        current_time: Timestamp,
        entry_time: Timestamp,
        amount: i32,
    ) -> Result<Ticket, LedgerError>;

    /// Reserve the next unit of `ticket_id` for `owner_id`.
    ///
    /// Draws the next sequence number, resolves its entry time and records
    /// the member ticket as one step. On failure no capacity is consumed.
    async fn reserve(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        owner_id: DbId,
        current_time: Timestamp,
    ) -> Result<MemberTicket, LedgerError>;
}
