use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use super::{CapacityLedger, LedgerError};
use crate::member_ticket::MemberTicket;
use crate::stage::Stage;
use crate::ticket::Ticket;
use crate::types::{DbId, Timestamp};

/// Single-node ledger holding tickets in memory.
///
/// The outer map lock is held only long enough to clone the ticket's
/// `Arc`; the per-ticket mutex serialises all capacity changes for that
/// ticket.
#[derive(Debug, Default)]
pub struct InMemoryCapacityLedger {
    tickets: RwLock<HashMap<DbId, Arc<Mutex<Ticket>>>>,
    reservations: Mutex<Vec<MemberTicket>>,
    next_member_ticket_id: AtomicI64,
}

impl InMemoryCapacityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a ticket.
    pub fn insert_ticket(&self, ticket: Ticket) {
        let mut tickets = self.tickets.write().unwrap_or_else(|e| e.into_inner());
        tickets.insert(ticket.id, Arc::new(Mutex::new(ticket)));
    }

    /// Snapshot of a ticket's current state.
    pub fn ticket(&self, ticket_id: DbId) -> Option<Ticket> {
        let entry = self.entry(ticket_id)?;
        let ticket = entry.lock().unwrap_or_else(|e| e.into_inner());
        Some(ticket.clone())
    }

    /// Reservations recorded for `ticket_id`, in issue order.
    pub fn reservations(&self, ticket_id: DbId) -> Vec<MemberTicket> {
        self.reservations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.ticket_id == ticket_id)
            .cloned()
            .collect()
    }

    fn entry(&self, ticket_id: DbId) -> Option<Arc<Mutex<Ticket>>> {
        let tickets = self.tickets.read().unwrap_or_else(|e| e.into_inner());
        tickets.get(&ticket_id).cloned()
    }
}

#[async_trait]
impl CapacityLedger for InMemoryCapacityLedger {
    async fn add_entry_time_slot(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        current_time: Timestamp,
        entry_time: Timestamp,
        amount: i32,
    ) -> Result<Ticket, LedgerError> {
        let entry = self
            .entry(ticket_id)
            .ok_or(LedgerError::TicketNotFound(ticket_id))?;
        let mut ticket = entry.lock().unwrap_or_else(|e| e.into_inner());
        ticket.add_entry_time_slot(stage, current_time, entry_time, amount)?;
        Ok(ticket.clone())
    }

    async fn reserve(
        &self,
        ticket_id: DbId,
        stage: &Stage,
        owner_id: DbId,
        current_time: Timestamp,
    ) -> Result<MemberTicket, LedgerError> {
        let entry = self
            .entry(ticket_id)
            .ok_or(LedgerError::TicketNotFound(ticket_id))?;
        let mut ticket = entry.lock().unwrap_or_else(|e| e.into_inner());
        let new_member_ticket = ticket.reserve(stage, owner_id, current_time)?;

        let id = self.next_member_ticket_id.fetch_add(1, Ordering::Relaxed) + 1;
        let member_ticket = new_member_ticket.with_id(id);
        self.reservations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(member_ticket.clone());
        drop(ticket);

        tracing::debug!(
            ticket_id,
            owner_id,
            number = member_ticket.number,
            "Reserved ticket"
        );
        Ok(member_ticket)
    }
}
