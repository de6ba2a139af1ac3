use super::IIntakeRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::query_structs::StatusCounts;
use crate::repos::shared::repo::DeleteResult;
use pillbox_domain::{Intake, IntakeStatus, ID};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryIntakeRepo {
    intakes: Mutex<Vec<Intake>>,
    next_id: AtomicI64,
}

impl InMemoryIntakeRepo {
    pub fn new() -> Self {
        Self {
            intakes: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IIntakeRepo for InMemoryIntakeRepo {
    async fn insert(&self, intake: &Intake) -> anyhow::Result<Option<Intake>> {
        let duplicates = find_by(&self.intakes, |existing: &Intake| {
            existing.user_id == intake.user_id
                && existing.slot == intake.slot
                && existing.planned_day == intake.planned_day
        });
        if !duplicates.is_empty() {
            return Ok(None);
        }

        let mut stored = intake.clone();
        stored.id = ID::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        insert(&stored, &self.intakes);
        Ok(Some(stored))
    }

    async fn find(&self, intake_id: &ID) -> Option<Intake> {
        find(intake_id, &self.intakes)
    }

    async fn close(
        &self,
        intake_id: &ID,
        user_id: &ID,
        status: IntakeStatus,
        now: i64,
    ) -> anyhow::Result<Option<Intake>> {
        let updated = update_by(
            &self.intakes,
            |intake: &Intake| intake.id == *intake_id && intake.user_id == *user_id,
            |intake| {
                intake.status = status;
                intake.snoozed_until = None;
                intake.updated_at = now;
            },
        );
        Ok(updated)
    }

    async fn set_snoozed_until(
        &self,
        intake_id: &ID,
        user_id: &ID,
        run_at: i64,
        now: i64,
    ) -> anyhow::Result<Option<Intake>> {
        let updated = update_by(
            &self.intakes,
            |intake: &Intake| {
                intake.id == *intake_id
                    && intake.user_id == *user_id
                    && intake.status == IntakeStatus::Sent
            },
            |intake| {
                intake.snoozed_until = Some(run_at);
                intake.updated_at = now;
            },
        );
        Ok(updated)
    }

    async fn status_counts_since(&self, user_id: &ID, since: i64) -> anyhow::Result<StatusCounts> {
        let closed = find_by(&self.intakes, |intake: &Intake| {
            intake.user_id == *user_id && intake.created_at >= since && intake.status.is_closed()
        });
        let mut counts = StatusCounts::default();
        for intake in closed {
            match intake.status {
                IntakeStatus::Taken => counts.taken += 1,
                IntakeStatus::Skip => counts.skipped += 1,
                IntakeStatus::Sent => (),
            }
        }
        Ok(counts)
    }

    async fn find_last_updated(&self, user_id: &ID) -> Option<Intake> {
        find_by(&self.intakes, |intake: &Intake| intake.user_id == *user_id)
            .into_iter()
            .max_by_key(|intake| intake.updated_at)
    }

    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.intakes, |intake: &Intake| {
            intake.user_id == *user_id
        }))
    }
}
