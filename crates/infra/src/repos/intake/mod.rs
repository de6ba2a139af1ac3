mod inmemory;
mod postgres;

pub use inmemory::InMemoryIntakeRepo;
pub use postgres::PostgresIntakeRepo;

use crate::repos::shared::query_structs::StatusCounts;
use crate::repos::shared::repo::DeleteResult;
use pillbox_domain::{Intake, IntakeStatus, ID};

#[async_trait::async_trait]
pub trait IIntakeRepo: Send + Sync {
    /// Insert the intake, returning the stored row with its assigned id.
    /// `None` means an intake for the same (user, slot, day) already
    /// exists; the uniqueness constraint is the idempotency signal for
    /// daily creation.
    async fn insert(&self, intake: &Intake) -> anyhow::Result<Option<Intake>>;
    async fn find(&self, intake_id: &ID) -> Option<Intake>;
    /// Owner-scoped terminal transition as a single conditional update:
    /// sets the status, clears any snooze deadline and bumps `updated_at`.
    /// `None` when the intake does not exist or belongs to another user.
    async fn close(
        &self,
        intake_id: &ID,
        user_id: &ID,
        status: IntakeStatus,
        now: i64,
    ) -> anyhow::Result<Option<Intake>>;
    /// Owner-scoped snooze-deadline update, guarded by `status = sent` so
    /// a concurrent close wins over a concurrent snooze.
    async fn set_snoozed_until(
        &self,
        intake_id: &ID,
        user_id: &ID,
        run_at: i64,
        now: i64,
    ) -> anyhow::Result<Option<Intake>>;
    async fn status_counts_since(&self, user_id: &ID, since: i64) -> anyhow::Result<StatusCounts>;
    async fn find_last_updated(&self, user_id: &ID) -> Option<Intake>;
    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult>;
}
