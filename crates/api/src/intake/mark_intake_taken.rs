use crate::{error::PillboxError, shared::usecase::UseCase};
use pillbox_domain::{Intake, IntakeStatus, ID};
use pillbox_infra::PillboxContext;

/// Closes an intake as taken. Repeating the same action is idempotent;
/// closing to a different status is a conflict surfaced to the caller.
#[derive(Debug)]
pub struct MarkIntakeTakenUseCase {
    pub intake_id: ID,
    pub user_id: ID,
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
impl UseCase for MarkIntakeTakenUseCase {
    type Response = Intake;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkIntakeTaken";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        close_intake(ctx, &self.intake_id, &self.user_id, IntakeStatus::Taken).await
    }
}

/// Shared closing path for the taken and skip actions. Ownership is
/// enforced by scoping the lookup to the acting user.
pub async fn close_intake(
    ctx: &PillboxContext,
    intake_id: &ID,
    user_id: &ID,
    status: IntakeStatus,
) -> Result<Intake, UseCaseError> {
    let intake = match ctx.repos.intakes.find(intake_id).await {
        Some(intake) if intake.user_id == *user_id => intake,
        _ => return Err(UseCaseError::IntakeNotFound(*intake_id)),
    };
    // Duplicate taps happen; repeating the same close is a no-op success
    if intake.status == status {
        return Ok(intake);
    }
    if intake.status.is_closed() {
        return Err(UseCaseError::AlreadyClosed(*intake_id));
    }

    let now = ctx.sys.get_timestamp_millis();
    ctx.repos
        .intakes
        .close(intake_id, user_id, status, now)
        .await
        .map_err(|_| UseCaseError::StorageError)?
        .ok_or(UseCaseError::AlreadyClosed(*intake_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_domain::{Slot, User};

    async fn seed_intake(ctx: &PillboxContext, user_id: i64) -> Intake {
        let user = User::new(ID::from(user_id), chrono_tz::UTC);
        ctx.repos.users.insert(&user).await.unwrap();
        let intake = Intake::new(user.id, Slot::First, 1_000, Default::default(), 1_000);
        ctx.repos.intakes.insert(&intake).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn marks_a_sent_intake_as_taken() {
        let ctx = PillboxContext::create_inmemory();
        let intake = seed_intake(&ctx, 7).await;

        let res = MarkIntakeTakenUseCase {
            intake_id: intake.id,
            user_id: intake.user_id,
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert_eq!(res.status, IntakeStatus::Taken);

        // Acknowledging again is an idempotent success
        let res = MarkIntakeTakenUseCase {
            intake_id: intake.id,
            user_id: intake.user_id,
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert_eq!(res.status, IntakeStatus::Taken);
    }

    #[tokio::test]
    async fn rejects_reclosing_with_a_different_status() {
        let ctx = PillboxContext::create_inmemory();
        let intake = seed_intake(&ctx, 7).await;
        ctx.repos
            .intakes
            .close(&intake.id, &intake.user_id, IntakeStatus::Skip, 2_000)
            .await
            .unwrap()
            .unwrap();

        let res = MarkIntakeTakenUseCase {
            intake_id: intake.id,
            user_id: intake.user_id,
        }
        .execute(&ctx)
        .await;
        assert!(matches!(res, Err(UseCaseError::AlreadyClosed(_))));

        let stored = ctx.repos.intakes.find(&intake.id).await.unwrap();
        assert_eq!(stored.status, IntakeStatus::Skip);
    }

    #[tokio::test]
    async fn rejects_other_users_intakes() {
        let ctx = PillboxContext::create_inmemory();
        let intake = seed_intake(&ctx, 7).await;

        let res = MarkIntakeTakenUseCase {
            intake_id: intake.id,
            user_id: ID::from(8),
        }
        .execute(&ctx)
        .await;
        assert!(matches!(res, Err(UseCaseError::IntakeNotFound(_))));

        // The intake is untouched
        let intake = ctx.repos.intakes.find(&intake.id).await.unwrap();
        assert_eq!(intake.status, IntakeStatus::Sent);
    }

    #[tokio::test]
    async fn rejects_unknown_intakes() {
        let ctx = PillboxContext::create_inmemory();

        let res = MarkIntakeTakenUseCase {
            intake_id: ID::from(999),
            user_id: ID::from(7),
        }
        .execute(&ctx)
        .await;
        assert!(matches!(res, Err(UseCaseError::IntakeNotFound(_))));
    }
}
