//! Ticket aggregate: capacity, entry-time slots and reservation allocation.

mod amount;
mod entry_time;

pub use amount::TicketAmount;
pub use entry_time::{EntryTimeSlot, EntryTimeSlots};

use serde::{Deserialize, Serialize};

use crate::error::TicketError;
use crate::member_ticket::{EntryState, NewMemberTicket};
use crate::stage::Stage;
use crate::types::{DbId, ReservationSequence, Timestamp};

/// Entry slots may open at most this many hours before the stage starts.
pub const EARLY_ENTRY_LIMIT_HOURS: i64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketType {
    Student,
    Visitor,
    Other,
}

impl TicketType {
    /// Name stored in the `ticket_type` TEXT columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Visitor => "VISITOR",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "STUDENT" => Some(Self::Student),
            "VISITOR" => Some(Self::Visitor),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// One sellable configuration of a stage: a ticket type with its capacity
/// and staggered entry times.
///
/// Invariant: `slots.total_amount() == amount.total_amount()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub stage_id: DbId,
    pub school_id: DbId,
    pub ticket_type: TicketType,
    amount: TicketAmount,
    slots: EntryTimeSlots,
}

impl Ticket {
    pub fn new(id: DbId, stage_id: DbId, school_id: DbId, ticket_type: TicketType) -> Self {
        Self {
            id,
            stage_id,
            school_id,
            ticket_type,
            amount: TicketAmount::new(),
            slots: EntryTimeSlots::new(),
        }
    }

    /// Rehydrate a persisted ticket.
    pub fn from_parts(
        id: DbId,
        stage_id: DbId,
        school_id: DbId,
        ticket_type: TicketType,
        amount: TicketAmount,
        slots: EntryTimeSlots,
    ) -> Self {
        Self {
            id,
            stage_id,
            school_id,
            ticket_type,
            amount,
            slots,
        }
    }

    pub fn amount(&self) -> &TicketAmount {
        &self.amount
    }

    pub fn slots(&self) -> &EntryTimeSlots {
        &self.slots
    }

    /// Append an entry-time slot, growing total capacity by `amount`.
    ///
    /// Rejected once sales have opened, or when `entry_time` falls outside
    /// `(ticket_open_time, start_time)` or earlier than
    /// [`EARLY_ENTRY_LIMIT_HOURS`] before the start.
    pub fn add_entry_time_slot(
        &mut self,
        stage: &Stage,
        current_time: Timestamp,
        entry_time: Timestamp,
        amount: i32,
    ) -> Result<(), TicketError> {
        self.check_stage(stage)?;
        validate_entry_time(stage, current_time, entry_time)?;

        let mut next_amount = self.amount;
        next_amount.add_total_amount(amount)?;

        self.amount = next_amount;
        self.slots.insert(EntryTimeSlot { entry_time, amount });
        Ok(())
    }

    /// Claim the next reservation sequence number from this ticket's own
    /// counter. Only meaningful while the caller holds the ticket's lock.
    pub fn increase_reserved_amount(&mut self) -> Result<ReservationSequence, TicketError> {
        self.amount.increase_reserved_amount()
    }

    /// Build the member ticket for an already-drawn `sequence`.
    ///
    /// Pure: does not touch the reserved counter.
    pub fn reserve_next(
        &self,
        stage: &Stage,
        owner_id: DbId,
        sequence: ReservationSequence,
        current_time: Timestamp,
    ) -> Result<NewMemberTicket, TicketError> {
        self.check_stage(stage)?;
        if stage.is_start(current_time) {
            return Err(TicketError::StageStarted);
        }
        let entry_time = self.slots.resolve(sequence).ok_or(TicketError::SoldOut)?;

        Ok(NewMemberTicket {
            owner_id,
            stage_id: self.stage_id,
            ticket_id: self.id,
            number: sequence,
            entry_time,
            ticket_type: self.ticket_type,
            entry_state: EntryState::BeforeEntry,
            reserved_at: current_time,
        })
    }

    /// Draw the next sequence and build its member ticket in one step.
    ///
    /// On any failure the reserved counter is left untouched.
    pub fn reserve(
        &mut self,
        stage: &Stage,
        owner_id: DbId,
        current_time: Timestamp,
    ) -> Result<NewMemberTicket, TicketError> {
        let mut next_amount = self.amount;
        let sequence = next_amount.increase_reserved_amount()?;
        let member_ticket = self.reserve_next(stage, owner_id, sequence, current_time)?;
        self.amount = next_amount;
        Ok(member_ticket)
    }

    fn check_stage(&self, stage: &Stage) -> Result<(), TicketError> {
        if stage.id != self.stage_id {
            return Err(TicketError::StageMismatch {
                expected: self.stage_id,
                actual: stage.id,
            });
        }
        Ok(())
    }
}

fn validate_entry_time(
    stage: &Stage,
    current_time: Timestamp,
    entry_time: Timestamp,
) -> Result<(), TicketError> {
    let start_time = stage.start_time();
    let ticket_open_time = stage.ticket_open_time();
    if current_time >= ticket_open_time {
        return Err(TicketError::TooLateToConfigure);
    }
    if entry_time <= ticket_open_time {
        return Err(TicketError::EntryBeforeOpen);
    }
    if entry_time >= start_time {
        return Err(TicketError::EntryAfterStageStart);
    }
    if entry_time < start_time - chrono::Duration::hours(EARLY_ENTRY_LIMIT_HOURS) {
        return Err(TicketError::EntryTooEarly {
            limit_hours: EARLY_ENTRY_LIMIT_HOURS,
        });
    }
    Ok(())
}
