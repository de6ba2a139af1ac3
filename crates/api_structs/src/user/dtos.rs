use pillbox_domain::{User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub timezone: String,
    pub reminders_enabled: bool,
    pub slot1_time: String,
    pub slot2_time: String,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            timezone: user.timezone.name().to_string(),
            reminders_enabled: user.reminders_enabled,
            slot1_time: user.slot1_time,
            slot2_time: user.slot2_time,
        }
    }
}
