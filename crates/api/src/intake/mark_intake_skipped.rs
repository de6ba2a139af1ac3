use crate::intake::mark_intake_taken::{close_intake, UseCaseError};
use crate::shared::usecase::UseCase;
use pillbox_domain::{Intake, IntakeStatus, ID};
use pillbox_infra::PillboxContext;

/// Closes an intake as skipped
#[derive(Debug)]
pub struct MarkIntakeSkippedUseCase {
    pub intake_id: ID,
    pub user_id: ID,
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkIntakeSkippedUseCase {
    type Response = Intake;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkIntakeSkipped";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        close_intake(ctx, &self.intake_id, &self.user_id, IntakeStatus::Skip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_domain::{Slot, User};

    #[tokio::test]
    async fn marks_a_sent_intake_as_skipped_and_clears_its_snooze() {
        let ctx = PillboxContext::create_inmemory();
        let user = User::new(ID::from(7), chrono_tz::UTC);
        ctx.repos.users.insert(&user).await.unwrap();
        let intake = Intake::new(user.id, Slot::First, 1_000, Default::default(), 1_000);
        let intake = ctx.repos.intakes.insert(&intake).await.unwrap().unwrap();
        ctx.repos
            .intakes
            .set_snoozed_until(&intake.id, &user.id, 5_000, 2_000)
            .await
            .unwrap()
            .unwrap();

        let res = MarkIntakeSkippedUseCase {
            intake_id: intake.id,
            user_id: user.id,
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert_eq!(res.status, IntakeStatus::Skip);
        assert_eq!(res.snoozed_until, None);

        // Skipping again is an idempotent success
        let res = MarkIntakeSkippedUseCase {
            intake_id: intake.id,
            user_id: user.id,
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert_eq!(res.status, IntakeStatus::Skip);
    }
}
