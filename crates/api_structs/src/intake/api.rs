use crate::dtos::{IntakeDTO, JournalStatsDTO};
use pillbox_domain::{Intake, ID};
use serde::{Deserialize, Serialize};

pub mod intake_action {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub intake_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Compact action encoding: "taken", "skip" or "snooze:<minutes>"
        pub action: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub intake: IntakeDTO,
    }

    impl APIResponse {
        pub fn new(intake: Intake) -> Self {
            Self {
                intake: IntakeDTO::new(intake),
            }
        }
    }
}

pub mod get_journal {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub stats: JournalStatsDTO,
    }
}
