use crate::{error::PillboxError, shared::usecase::UseCase};
use actix_web::{web, HttpResponse};
use pillbox_api_structs::{delete_user::PathParams, UserResponse};
use pillbox_domain::{User, ID};
use pillbox_infra::PillboxContext;

pub async fn delete_user_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<PillboxContext>,
) -> Result<HttpResponse, PillboxError> {
    let usecase = DeleteUserUseCase {
        user_id: path_params.user_id,
    };

    crate::shared::usecase::execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(UserResponse::new(user)))
        .map_err(PillboxError::from)
}

/// Removes a user together with all of their intakes and pending jobs
#[derive(Debug)]
pub struct DeleteUserUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for PillboxError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(id) => {
                Self::NotFound(format!("The user with id: {} was not found", id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteUser";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or(UseCaseError::UserNotFound(self.user_id))?;

        // Jobs go first so a tick running in between can not redeliver
        // for intakes that are about to disappear
        ctx.repos
            .pending_jobs
            .delete_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .intakes
            .delete_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        ctx.repos
            .users
            .delete(&self.user_id)
            .await
            .ok_or(UseCaseError::StorageError)?;

        Ok(user)
    }
}
