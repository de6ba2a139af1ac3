use crate::{error::PillboxError, shared::usecase::UseCase};
use actix_web::{web, HttpResponse};
use chrono_tz::Tz;
use pillbox_api_structs::{update_user_settings::*, UserResponse};
use pillbox_domain::{Slot, TimeOfDay, User, ID};
use pillbox_infra::PillboxContext;

pub async fn update_user_settings_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<PillboxContext>,
) -> Result<HttpResponse, PillboxError> {
    let body = body.into_inner();

    // Validate at the boundary so the use case only sees typed values
    let timezone = match &body.timezone {
        Some(tz) => Some(tz.parse::<Tz>().map_err(|_| {
            PillboxError::BadClientData(format!("Invalid timezone provided: {}", tz))
        })?),
        None => None,
    };
    let slot1_time = parse_slot_time(body.slot1_time.as_deref())?;
    let slot2_time = parse_slot_time(body.slot2_time.as_deref())?;

    let usecase = UpdateUserSettingsUseCase {
        user_id: path_params.user_id,
        timezone,
        reminders_enabled: body.reminders_enabled,
        slot1_time,
        slot2_time,
    };

    crate::shared::usecase::execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(UserResponse::new(user)))
        .map_err(PillboxError::from)
}

fn parse_slot_time(time: Option<&str>) -> Result<Option<TimeOfDay>, PillboxError> {
    match time {
        Some(time) => time
            .parse::<TimeOfDay>()
            .map(Some)
            .map_err(|_| {
                PillboxError::BadClientData(format!(
                    "Invalid slot time provided: {}, expected HH:MM",
                    time
                ))
            }),
        None => Ok(None),
    }
}

/// Applies a partial settings update; fields left unset keep their
/// stored value. Registers the user first if they are unknown.
#[derive(Debug)]
pub struct UpdateUserSettingsUseCase {
    pub user_id: ID,
    pub timezone: Option<Tz>,
    pub reminders_enabled: Option<bool>,
    pub slot1_time: Option<TimeOfDay>,
    pub slot2_time: Option<TimeOfDay>,
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
impl UseCase for UpdateUserSettingsUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateUserSettings";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        let mut user = match ctx.repos.users.find(&self.user_id).await {
            Some(user) => user,
            None => {
                let user = User::new(self.user_id, ctx.config.default_timezone);
                ctx.repos
                    .users
                    .insert(&user)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                user
            }
        };

        if let Some(timezone) = self.timezone {
            user.timezone = timezone;
        }
        if let Some(enabled) = self.reminders_enabled {
            user.reminders_enabled = enabled;
        }
        if let Some(time) = &self.slot1_time {
            user.set_slot_time(Slot::First, time);
        }
        if let Some(time) = &self.slot2_time {
            user.set_slot_time(Slot::Second, time);
        }

        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(user_id: i64) -> UpdateUserSettingsUseCase {
        UpdateUserSettingsUseCase {
            user_id: ID::from(user_id),
            timezone: None,
            reminders_enabled: None,
            slot1_time: None,
            slot2_time: None,
        }
    }

    #[tokio::test]
    async fn applies_only_the_provided_fields() {
        let ctx = PillboxContext::create_inmemory();
        let user = User::new(ID::from(7), chrono_tz::UTC);
        ctx.repos.users.insert(&user).await.unwrap();

        let mut usecase = update(7);
        usecase.slot1_time = Some("08:30".parse().unwrap());
        usecase.reminders_enabled = Some(false);
        let user = usecase.execute(&ctx).await.unwrap();

        assert_eq!(user.slot_time(Slot::First), "08:30");
        assert_eq!(user.slot_time(Slot::Second), "21:00");
        assert!(!user.reminders_enabled);
        assert_eq!(user.timezone, chrono_tz::UTC);

        let stored = ctx.repos.users.find(&user.id).await.unwrap();
        assert_eq!(stored.slot_time(Slot::First), "08:30");
    }

    #[tokio::test]
    async fn registers_unknown_users_before_updating() {
        let ctx = PillboxContext::create_inmemory();

        let mut usecase = update(7);
        usecase.timezone = Some(chrono_tz::Europe::Berlin);
        let user = usecase.execute(&ctx).await.unwrap();

        assert_eq!(user.timezone, chrono_tz::Europe::Berlin);
        assert!(ctx.repos.users.find(&user.id).await.is_some());
    }
}
