use crate::{error::PillboxError, shared::usecase::UseCase};
use actix_web::{web, HttpResponse};
use pillbox_api_structs::{get_user::PathParams, UserResponse};
use pillbox_domain::{User, ID};
use pillbox_infra::PillboxContext;

pub async fn get_user_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<PillboxContext>,
) -> Result<HttpResponse, PillboxError> {
    let usecase = GetUserUseCase {
        user_id: path_params.user_id,
    };

    crate::shared::usecase::execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(UserResponse::new(user)))
        .map_err(PillboxError::from)
}

/// Fetches a user, registering them with default settings on first
/// contact. Users are never created explicitly.
#[derive(Debug)]
pub struct GetUserUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for PillboxError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUser";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        if let Some(user) = ctx.repos.users.find(&self.user_id).await {
            return Ok(user);
        }

        let user = User::new(self.user_id, ctx.config.default_timezone);
        ctx.repos
            .users
            .insert(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_domain::{Slot, DEFAULT_SLOT1_TIME, DEFAULT_SLOT2_TIME};

    #[tokio::test]
    async fn registers_unknown_users_with_defaults() {
        let ctx = PillboxContext::create_inmemory();

        let user = GetUserUseCase {
            user_id: ID::from(7),
        }
        .execute(&ctx)
        .await
        .unwrap();

        assert_eq!(user.id, ID::from(7));
        assert!(user.reminders_enabled);
        assert_eq!(user.slot_time(Slot::First), DEFAULT_SLOT1_TIME);
        assert_eq!(user.slot_time(Slot::Second), DEFAULT_SLOT2_TIME);
        assert_eq!(user.timezone, ctx.config.default_timezone);

        // Registration is persisted
        assert!(ctx.repos.users.find(&user.id).await.is_some());
    }

    #[tokio::test]
    async fn returns_existing_users_untouched() {
        let ctx = PillboxContext::create_inmemory();
        let mut existing = User::new(ID::from(7), chrono_tz::Asia::Tokyo);
        existing.reminders_enabled = false;
        ctx.repos.users.insert(&existing).await.unwrap();

        let user = GetUserUseCase {
            user_id: ID::from(7),
        }
        .execute(&ctx)
        .await
        .unwrap();

        assert_eq!(user.timezone, chrono_tz::Asia::Tokyo);
        assert!(!user.reminders_enabled);
    }
}
