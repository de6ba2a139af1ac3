use crate::{
    shared::entity::{Entity, ID},
    user::Slot,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    /// Reminder was delivered, no user action yet
    Sent,
    Taken,
    Skip,
}

impl IntakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::Sent => "sent",
            IntakeStatus::Taken => "taken",
            IntakeStatus::Skip => "skip",
        }
    }

    /// Taken and Skip are terminal: no further transitions or deliveries.
    pub fn is_closed(&self) -> bool {
        matches!(self, IntakeStatus::Taken | IntakeStatus::Skip)
    }
}

impl Display for IntakeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum InvalidIntakeStatus {
    #[error("Intake status: {0} is unknown")]
    Unknown(String),
}

impl FromStr for IntakeStatus {
    type Err = InvalidIntakeStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(IntakeStatus::Sent),
            "taken" => Ok(IntakeStatus::Taken),
            "skip" => Ok(IntakeStatus::Skip),
            _ => Err(InvalidIntakeStatus::Unknown(s.to_string())),
        }
    }
}

/// A single occurrence of a reminder: one slot, one user, one calendar day
/// in the user's timezone.
///
/// `planned_day` is the user-local day at creation and backs the unique
/// `(user_id, slot, planned_day)` constraint that makes daily creation
/// idempotent. `planned_at` is the slot wall-clock time resolved to an
/// instant on that day.
#[derive(Debug, Clone)]
pub struct Intake {
    pub id: ID,
    pub user_id: ID,
    pub planned_at: i64,
    pub planned_day: NaiveDate,
    pub slot: Slot,
    pub status: IntakeStatus,
    /// Instant of the latest requested re-delivery, if any. Snoozing does
    /// not change `status`; it only schedules a `PendingJob`.
    pub snoozed_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Intake {
    pub fn new(user_id: ID, slot: Slot, planned_at: i64, planned_day: NaiveDate, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            planned_at,
            planned_day,
            slot,
            status: IntakeStatus::Sent,
            snoozed_until: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Intake {
    fn id(&self) -> ID {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [IntakeStatus::Sent, IntakeStatus::Taken, IntakeStatus::Skip] {
            assert_eq!(status.as_str().parse::<IntakeStatus>().unwrap(), status);
        }
        assert!("done".parse::<IntakeStatus>().is_err());
    }

    #[test]
    fn only_taken_and_skip_are_terminal() {
        assert!(!IntakeStatus::Sent.is_closed());
        assert!(IntakeStatus::Taken.is_closed());
        assert!(IntakeStatus::Skip.is_closed());
    }
}
