use crate::{
    shared::entity::{Entity, ID},
    time::TimeOfDay,
};
use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_SLOT1_TIME: &str = "09:00";
pub const DEFAULT_SLOT2_TIME: &str = "21:00";

/// One of the two configured daily reminder times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn all() -> [Slot; 2] {
        [Slot::First, Slot::Second]
    }

    /// Wire and storage representation: 1 or 2
    pub fn number(self) -> i16 {
        match self {
            Slot::First => 1,
            Slot::Second => 2,
        }
    }
}

#[derive(Error, Debug)]
pub enum InvalidSlot {
    #[error("Slot: {0} is invalid, expected 1 or 2")]
    OutOfRange(i16),
}

impl TryFrom<i16> for Slot {
    type Error = InvalidSlot;

    fn try_from(number: i16) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Slot::First),
            2 => Ok(Slot::Second),
            n => Err(InvalidSlot::OutOfRange(n)),
        }
    }
}

/// Per-user reminder configuration. The id is assigned by the external
/// messaging transport; the engine creates a default row the first time it
/// sees a user and never deletes it on its own.
///
/// Slot times are kept as raw text and parsed at decision time: a value
/// that fails to parse silently disables that slot instead of failing the
/// scheduler tick.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub timezone: Tz,
    pub reminders_enabled: bool,
    pub slot1_time: String,
    pub slot2_time: String,
}

impl User {
    pub fn new(id: ID, timezone: Tz) -> Self {
        Self {
            id,
            timezone,
            reminders_enabled: true,
            slot1_time: DEFAULT_SLOT1_TIME.into(),
            slot2_time: DEFAULT_SLOT2_TIME.into(),
        }
    }

    pub fn slot_time(&self, slot: Slot) -> &str {
        match slot {
            Slot::First => &self.slot1_time,
            Slot::Second => &self.slot2_time,
        }
    }

    pub fn set_slot_time(&mut self, slot: Slot, time: &TimeOfDay) {
        let canonical = time.to_string();
        match slot {
            Slot::First => self.slot1_time = canonical,
            Slot::Second => self.slot2_time = canonical,
        }
    }
}

impl Entity for User {
    fn id(&self) -> ID {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_numbers_round_trip() {
        for slot in Slot::all() {
            assert_eq!(Slot::try_from(slot.number()).unwrap(), slot);
        }
        assert!(Slot::try_from(0).is_err());
        assert!(Slot::try_from(3).is_err());
    }

    #[test]
    fn set_slot_time_stores_canonical_form() {
        let mut user = User::new(ID::from(1), chrono_tz::UTC);
        user.set_slot_time(Slot::Second, &"7:5".parse().unwrap());
        assert_eq!(user.slot_time(Slot::Second), "07:05");
        assert_eq!(user.slot_time(Slot::First), DEFAULT_SLOT1_TIME);
    }
}
