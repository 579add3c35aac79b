use serde::Serialize;

use crate::types::{ReservationSequence, Timestamp};

/// One staggered entry window: `amount` reservations enter at `entry_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryTimeSlot {
    pub entry_time: Timestamp,
    pub amount: i32,
}

/// Append-only slots kept in ascending `entry_time` order.
///
/// Slots with equal entry times keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntryTimeSlots {
    slots: Vec<EntryTimeSlot>,
}

impl EntryTimeSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted rows in any order.
    pub fn from_slots(slots: impl IntoIterator<Item = EntryTimeSlot>) -> Self {
        let mut sorted = Self::new();
        for slot in slots {
            sorted.insert(slot);
        }
        sorted
    }

    pub(crate) fn insert(&mut self, slot: EntryTimeSlot) {
        let index = self
            .slots
            .partition_point(|existing| existing.entry_time <= slot.entry_time);
        self.slots.insert(index, slot);
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntryTimeSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_amount(&self) -> i32 {
        self.slots.iter().map(|slot| slot.amount).sum()
    }

    /// Entry time of the slot covering `sequence`, scanning cumulative
    /// amounts in ascending order. `None` for sequences below 1 or past the
    /// total.
    pub fn resolve(&self, sequence: ReservationSequence) -> Option<Timestamp> {
        if sequence < 1 {
            return None;
        }
        let mut last_sequence = 0;
        for slot in &self.slots {
            last_sequence += slot.amount;
            if sequence <= last_sequence {
                return Some(slot.entry_time);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2023, 8, 12, 12, 0, 0).unwrap()
    }

    fn slot(hours: i64, amount: i32) -> EntryTimeSlot {
        EntryTimeSlot {
            entry_time: base() + Duration::hours(hours),
            amount,
        }
    }

    #[test]
    fn resolves_by_cumulative_amount() {
        let slots = EntryTimeSlots::from_slots([slot(1, 2), slot(2, 3)]);

        assert_eq!(slots.resolve(1), Some(base() + Duration::hours(1)));
        assert_eq!(slots.resolve(2), Some(base() + Duration::hours(1)));
        assert_eq!(slots.resolve(3), Some(base() + Duration::hours(2)));
        assert_eq!(slots.resolve(5), Some(base() + Duration::hours(2)));
        assert_eq!(slots.resolve(6), None);
    }

    #[test]
    fn keeps_ascending_order_regardless_of_insertion() {
        let slots = EntryTimeSlots::from_slots([slot(3, 50), slot(1, 30), slot(2, 20)]);

        let hours: Vec<_> = slots
            .iter()
            .map(|s| (s.entry_time - base()).num_hours())
            .collect();
        assert_eq!(hours, vec![1, 2, 3]);
        assert_eq!(slots.total_amount(), 100);
        // The earliest slot owns the first 30 sequence numbers.
        assert_eq!(slots.resolve(30), Some(base() + Duration::hours(1)));
        assert_eq!(slots.resolve(31), Some(base() + Duration::hours(2)));
    }

    #[test]
    fn equal_entry_times_keep_insertion_order() {
        let slots = EntryTimeSlots::from_slots([slot(1, 5), slot(1, 7)]);
        let amounts: Vec<_> = slots.iter().map(|s| s.amount).collect();
        assert_eq!(amounts, vec![5, 7]);
    }

    #[test]
    fn resolution_is_monotonic() {
        let slots = EntryTimeSlots::from_slots([slot(2, 4), slot(1, 3), slot(3, 1), slot(2, 2)]);
        let total = slots.total_amount();

        let resolved: Vec<_> = (1..=total).map(|seq| slots.resolve(seq).unwrap()).collect();
        assert!(resolved.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(slots.resolve(total + 1), None);
    }

    #[test]
    fn empty_slots_resolve_nothing() {
        assert_eq!(EntryTimeSlots::new().resolve(1), None);
    }

    #[test]
    fn sequences_below_one_resolve_nothing() {
        let slots = EntryTimeSlots::from_slots([slot(1, 2)]);
        assert_eq!(slots.resolve(0), None);
        assert_eq!(slots.resolve(-4), None);
    }
}
