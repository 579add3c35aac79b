use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Coarse classification of [`TicketError`] variants.
///
/// Callers that only need to pick a response category (HTTP status,
/// user-facing message family) match on this instead of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    SoldOut,
    StageStarted,
    CodeExpired,
    CodeInvalid,
    DoubleEntry,
    NotOwner,
    Internal,
}

/// Domain errors raised by ticket configuration, reservation and entry.
///
/// Every variant leaves the aggregate it was raised from unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    #[error("Entry time slots cannot be added once ticket sales have opened")]
    TooLateToConfigure,

    #[error("Entry time must be after the ticket open time")]
    EntryBeforeOpen,

    #[error("Entry time must be before the stage start time")]
    EntryAfterStageStart,

    #[error("Entry time must be at most {limit_hours} hours before the stage start time")]
    EntryTooEarly { limit_hours: i64 },

    #[error("Ticket amount must be positive, got {0}")]
    InvalidAmount(i32),

    #[error("Adding {amount} to a total of {total} exceeds the ticket capacity limit")]
    CapacityOverflow { total: i32, amount: i32 },

    #[error("Ticket open time must be before the stage start time")]
    InvalidTicketOpenTime,

    #[error("Ticket belongs to stage {expected}, got stage {actual}")]
    StageMismatch { expected: DbId, actual: DbId },

    #[error("Ticket is sold out")]
    SoldOut,

    #[error("Cannot reserve a ticket once the stage has started")]
    StageStarted,

    #[error("Member ticket is not within its entry window")]
    NotEntryTime,

    #[error("Member ticket has already been used for entry")]
    DoubleEntry,

    #[error("Invalid entry state index: {0}")]
    InvalidEntryStateIndex(i16),

    #[error("Entry code expiration must be in the future")]
    InvalidExpiration,

    #[error("Entry code has expired")]
    CodeExpired,

    #[error("Entry code is invalid")]
    CodeInvalid,

    #[error("Member ticket does not belong to the member")]
    NotOwner,
}

impl TicketError {
    /// Classify this error into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooLateToConfigure
            | Self::EntryBeforeOpen
            | Self::EntryAfterStageStart
            | Self::EntryTooEarly { .. }
            | Self::InvalidAmount(_)
            | Self::CapacityOverflow { .. }
            | Self::InvalidTicketOpenTime
            | Self::NotEntryTime => ErrorKind::Validation,
            Self::SoldOut => ErrorKind::SoldOut,
            Self::StageStarted => ErrorKind::StageStarted,
            Self::CodeExpired => ErrorKind::CodeExpired,
            Self::CodeInvalid => ErrorKind::CodeInvalid,
            Self::DoubleEntry => ErrorKind::DoubleEntry,
            Self::NotOwner => ErrorKind::NotOwner,
            Self::StageMismatch { .. }
            | Self::InvalidEntryStateIndex(_)
            | Self::InvalidExpiration => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLateToConfigure => "INVALID_TICKET_CREATE_TIME",
            Self::EntryBeforeOpen => "EARLY_TICKET_ENTRY_THAN_OPEN",
            Self::EntryAfterStageStart => "LATE_TICKET_ENTRY_TIME",
            Self::EntryTooEarly { .. } => "EARLY_TICKET_ENTRY_TIME",
            Self::InvalidAmount(_) => "INVALID_TICKET_AMOUNT",
            Self::CapacityOverflow { .. } => "TICKET_AMOUNT_OVERFLOW",
            Self::InvalidTicketOpenTime => "INVALID_TICKET_OPEN_TIME",
            Self::StageMismatch { .. } => "TICKET_STAGE_MISMATCH",
            Self::SoldOut => "TICKET_SOLD_OUT",
            Self::StageStarted => "TICKET_CANNOT_RESERVE_STAGE_START",
            Self::NotEntryTime => "NOT_ENTRY_TIME",
            Self::DoubleEntry => "ALREADY_ENTRIED",
            Self::InvalidEntryStateIndex(_) => "INVALID_ENTRY_STATE_INDEX",
            Self::InvalidExpiration => "INVALID_ENTRY_CODE_EXPIRATION_TIME",
            Self::CodeExpired => "EXPIRED_ENTRY_CODE",
            Self::CodeInvalid => "INVALID_ENTRY_CODE",
            Self::NotOwner => "NOT_MEMBER_TICKET_OWNER",
        }
    }
}
