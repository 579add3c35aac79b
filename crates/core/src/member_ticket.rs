//! A member's confirmed reservation and its entry-state machine.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::TicketError;
use crate::ticket::TicketType;
use crate::types::{DbId, ReservationSequence, Timestamp};

/// Hours after `entry_time` during which a member ticket can be used.
pub const ENTRY_LIMIT_HOURS: i64 = 24;

/// Stored entry state. Discriminants are the persisted / token indices.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryState {
    BeforeEntry = 0,
    Entried = 1,
}

impl EntryState {
    pub fn index(self) -> i16 {
        self as i16
    }

    pub fn from_index(index: i16) -> Result<Self, TicketError> {
        match index {
            0 => Ok(Self::BeforeEntry),
            1 => Ok(Self::Entried),
            other => Err(TicketError::InvalidEntryStateIndex(other)),
        }
    }
}

/// A reservation produced by [`crate::ticket::Ticket::reserve_next`],
/// not yet assigned an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMemberTicket {
    pub owner_id: DbId,
    pub stage_id: DbId,
    pub ticket_id: DbId,
    pub number: ReservationSequence,
    pub entry_time: Timestamp,
    pub ticket_type: TicketType,
    pub entry_state: EntryState,
    pub reserved_at: Timestamp,
}

impl NewMemberTicket {
    pub fn with_id(self, id: DbId) -> MemberTicket {
        MemberTicket {
            id,
            owner_id: self.owner_id,
            stage_id: self.stage_id,
            ticket_id: self.ticket_id,
            number: self.number,
            entry_time: self.entry_time,
            ticket_type: self.ticket_type,
            entry_state: self.entry_state,
            reserved_at: self.reserved_at,
        }
    }
}

/// A persisted reservation. `entry_time` is fixed at allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberTicket {
    pub id: DbId,
    pub owner_id: DbId,
    pub stage_id: DbId,
    pub ticket_id: DbId,
    pub number: ReservationSequence,
    pub entry_time: Timestamp,
    pub ticket_type: TicketType,
    pub entry_state: EntryState,
    pub reserved_at: Timestamp,
}

impl MemberTicket {
    pub fn is_owner(&self, member_id: DbId) -> bool {
        self.owner_id == member_id
    }

    /// Entry is allowed from `entry_time` for [`ENTRY_LIMIT_HOURS`], and
    /// only while the ticket has not been used.
    pub fn can_entry(&self, now: Timestamp) -> bool {
        self.entry_state == EntryState::BeforeEntry
            && now >= self.entry_time
            && now < self.entry_time + Duration::hours(ENTRY_LIMIT_HOURS)
    }

    pub fn is_before_entry(&self, now: Timestamp) -> bool {
        now < self.entry_time
    }

    pub fn mark_entried(&mut self) -> Result<(), TicketError> {
        match self.entry_state {
            EntryState::BeforeEntry => {
                self.entry_state = EntryState::Entried;
                Ok(())
            }
            EntryState::Entried => Err(TicketError::DoubleEntry),
        }
    }
}

/// Keep the tickets a member may still use, soonest relevant first.
///
/// A ticket is current while it is before its entry time or inside its
/// entry window. Tickets that can enter right now sort ahead of upcoming
/// ones; within each group the one whose entry time is closest to `now`
/// comes first.
pub fn select_current(tickets: Vec<MemberTicket>, now: Timestamp) -> Vec<MemberTicket> {
    let mut current: Vec<_> = tickets
        .into_iter()
        .filter(|t| t.is_before_entry(now) || t.can_entry(now))
        .collect();
    current.sort_by_key(|t| (t.is_before_entry(now), (t.entry_time - now).num_seconds().abs()));
    current
}
