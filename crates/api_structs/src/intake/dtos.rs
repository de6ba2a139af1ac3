use pillbox_domain::{Intake, IntakeStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IntakeDTO {
    pub id: ID,
    pub user_id: ID,
    pub planned_at: i64,
    pub slot: i16,
    pub status: IntakeStatus,
    pub snoozed_until: Option<i64>,
    pub updated_at: i64,
}

impl IntakeDTO {
    pub fn new(intake: Intake) -> Self {
        Self {
            id: intake.id,
            user_id: intake.user_id,
            planned_at: intake.planned_at,
            slot: intake.slot.number(),
            status: intake.status,
            snoozed_until: intake.snoozed_until,
            updated_at: intake.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JournalStatsDTO {
    pub taken: i64,
    pub skipped: i64,
    /// Percentage of closed intakes marked taken inside the journal
    /// window, unrounded. Rounding is left to the presentation layer.
    pub adherence: f64,
    pub last_intake: Option<IntakeDTO>,
}
