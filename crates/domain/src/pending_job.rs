use crate::shared::entity::{Entity, ID};

/// A durable request to re-deliver a reminder for an intake at `run_at`.
/// Created by a snooze action and consumed by the first scheduler tick
/// running at or after `run_at`.
#[derive(Debug, Clone)]
pub struct PendingJob {
    pub id: ID,
    pub user_id: ID,
    pub intake_id: ID,
    pub run_at: i64,
    pub created_at: i64,
}

impl PendingJob {
    pub fn new(user_id: ID, intake_id: ID, run_at: i64, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            intake_id,
            run_at,
            created_at: now,
        }
    }
}

impl Entity for PendingJob {
    fn id(&self) -> ID {
        self.id
    }
}
