use serde::Serialize;

use crate::error::TicketError;
use crate::types::ReservationSequence;

/// Capacity accounting for one ticket.
///
/// `reserved_amount` never exceeds `total_amount`. The struct itself is
/// not synchronised; whoever owns it (see [`crate::ledger`]) must hold a
/// per-ticket lock across `increase_reserved_amount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketAmount {
    total_amount: i32,
    reserved_amount: i32,
}

impl TicketAmount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted counters.
    pub fn from_parts(total_amount: i32, reserved_amount: i32) -> Self {
        Self {
            total_amount,
            reserved_amount,
        }
    }

    pub fn total_amount(&self) -> i32 {
        self.total_amount
    }

    pub fn reserved_amount(&self) -> i32 {
        self.reserved_amount
    }

    pub fn remaining_amount(&self) -> i32 {
        self.total_amount - self.reserved_amount
    }

    pub fn is_sold_out(&self) -> bool {
        self.reserved_amount >= self.total_amount
    }

    pub fn add_total_amount(&mut self, amount: i32) -> Result<(), TicketError> {
        if amount <= 0 {
            return Err(TicketError::InvalidAmount(amount));
        }
        self.total_amount = self
            .total_amount
            .checked_add(amount)
            .ok_or(TicketError::CapacityOverflow {
                total: self.total_amount,
                amount,
            })?;
        Ok(())
    }

    /// Reserve one unit and return its 1-based sequence number.
    pub fn increase_reserved_amount(&mut self) -> Result<ReservationSequence, TicketError> {
        if self.is_sold_out() {
            return Err(TicketError::SoldOut);
        }
        self.reserved_amount += 1;
        Ok(self.reserved_amount)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn reserving_up_to_total_then_sold_out() {
        let mut amount = TicketAmount::new();
        amount.add_total_amount(2).unwrap();

        assert_eq!(amount.increase_reserved_amount(), Ok(1));
        assert_eq!(amount.increase_reserved_amount(), Ok(2));
        assert_matches!(amount.increase_reserved_amount(), Err(TicketError::SoldOut));
        assert_eq!(amount.reserved_amount(), 2);
    }

    #[test]
    fn empty_amount_is_sold_out() {
        let mut amount = TicketAmount::new();
        assert_matches!(amount.increase_reserved_amount(), Err(TicketError::SoldOut));
        assert_eq!(amount.reserved_amount(), 0);
    }

    #[test]
    fn non_positive_total_is_rejected() {
        let mut amount = TicketAmount::new();
        assert_matches!(amount.add_total_amount(0), Err(TicketError::InvalidAmount(0)));
        assert_matches!(amount.add_total_amount(-3), Err(TicketError::InvalidAmount(-3)));
        assert_eq!(amount.total_amount(), 0);
    }

    #[test]
    fn total_beyond_i32_is_rejected() {
        let mut amount = TicketAmount::new();
        amount.add_total_amount(i32::MAX).unwrap();
        assert_matches!(
            amount.add_total_amount(1),
            Err(TicketError::CapacityOverflow { total: i32::MAX, amount: 1 })
        );
        assert_eq!(amount.total_amount(), i32::MAX);
        assert_eq!(amount.remaining_amount(), i32::MAX);
    }

    #[test]
    fn concurrent_reservations_never_oversell() {
        let mut amount = TicketAmount::new();
        amount.add_total_amount(50).unwrap();
        let shared = Arc::new(Mutex::new(amount));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let mut won = Vec::new();
                    for _ in 0..20 {
                        if let Ok(seq) = shared.lock().unwrap().increase_reserved_amount() {
                            won.push(seq);
                        }
                    }
                    won
                })
            })
            .collect();

        let mut sequences: Vec<i32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        sequences.sort_unstable();

        assert_eq!(sequences, (1..=50).collect::<Vec<_>>());
        assert_eq!(shared.lock().unwrap().remaining_amount(), 0);
    }
}
