use crate::{error::PillboxError, shared::usecase::UseCase};
use pillbox_domain::{Intake, PendingJob, ID};
use pillbox_infra::PillboxContext;

/// Defers the reminder for an open intake by a number of minutes. A
/// pending job is recorded for the scheduler tick to redeliver once it
/// comes due; snoozing again supersedes any earlier deferral.
#[derive(Debug)]
pub struct SnoozeIntakeUseCase {
    pub intake_id: ID,
    pub user_id: ID,
    pub minutes: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    IntakeNotFound(ID),
    AlreadyClosed(ID),
    StorageError,
}

impl From<UseCaseError> for PillboxError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::IntakeNotFound(id) => {
                Self::NotFound(format!("The intake with id: {} was not found", id))
            }
            UseCaseError::AlreadyClosed(id) => {
                Self::Conflict(format!("The intake with id: {} is already closed", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SnoozeIntakeUseCase {
    type Response = Intake;

    type Error = UseCaseError;

    const NAME: &'static str = "SnoozeIntake";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        let intake = match ctx.repos.intakes.find(&self.intake_id).await {
            Some(intake) if intake.user_id == self.user_id => intake,
            _ => return Err(UseCaseError::IntakeNotFound(self.intake_id)),
        };
        if intake.status.is_closed() {
            return Err(UseCaseError::AlreadyClosed(self.intake_id));
        }

        let now = ctx.sys.get_timestamp_millis();
        let run_at = now + self.minutes * 60 * 1000;

        // Guarded on status, to handle a close racing in between
        let intake = ctx
            .repos
            .intakes
            .set_snoozed_until(&self.intake_id, &self.user_id, run_at, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::AlreadyClosed(self.intake_id))?;

        // Supersede earlier snoozes before recording the new job
        ctx.repos
            .pending_jobs
            .delete_by_intake(&self.intake_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .pending_jobs
            .insert(&PendingJob::new(self.user_id, self.intake_id, run_at, now))
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(intake)
    }
}
