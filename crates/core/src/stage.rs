//! Stage timing as seen by the ticketing domain.
//!
//! Festival and line-up management live elsewhere; tickets only need a
//! stage's identity, its start time and when ticket sales open.

use serde::Serialize;

use crate::error::TicketError;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: DbId,
    pub festival_id: DbId,
    pub line_up: Option<String>,
    start_time: Timestamp,
    ticket_open_time: Timestamp,
}

impl Stage {
    /// Build a stage, rejecting a ticket open time at or after the start time.
    pub fn new(
        id: DbId,
        festival_id: DbId,
        line_up: Option<String>,
        start_time: Timestamp,
        ticket_open_time: Timestamp,
    ) -> Result<Self, TicketError> {
        if ticket_open_time >= start_time {
            return Err(TicketError::InvalidTicketOpenTime);
        }
        Ok(Self {
            id,
            festival_id,
            line_up,
            start_time,
            ticket_open_time,
        })
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    pub fn ticket_open_time(&self) -> Timestamp {
        self.ticket_open_time
    }

    /// Whether the stage has started at `now`.
    pub fn is_start(&self, now: Timestamp) -> bool {
        now >= self.start_time
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2023, 7, 26, 18, 0, 0).unwrap()
    }

    #[test]
    fn ticket_open_at_or_after_start_is_rejected() {
        for open in [start(), start() + Duration::seconds(1)] {
            assert_matches!(
                Stage::new(1, 1, None, start(), open),
                Err(TicketError::InvalidTicketOpenTime)
            );
        }
    }

    #[test]
    fn stage_is_started_from_its_start_time() {
        let stage = Stage::new(1, 1, None, start(), start() - Duration::hours(1)).unwrap();
        assert!(!stage.is_start(start() - Duration::seconds(1)));
        assert!(stage.is_start(start()));
        assert!(stage.is_start(start() + Duration::hours(1)));
    }
}
