use crate::error::PillboxError;
use crate::intake::mark_intake_skipped::MarkIntakeSkippedUseCase;
use crate::intake::mark_intake_taken::MarkIntakeTakenUseCase;
use crate::intake::snooze_intake::SnoozeIntakeUseCase;
use crate::shared::usecase::execute;
use actix_web::{web, HttpResponse};
use pillbox_api_structs::intake_action::{APIResponse, PathParams, RequestBody};
use pillbox_domain::IntakeAction;
use pillbox_infra::PillboxContext;

/// Applies a user action to an intake. The action comes in as a tagged
/// string ("taken", "skip" or "snooze:<minutes>") and is parsed here,
/// so the use cases below never see raw text.
pub async fn intake_action_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<PillboxContext>,
) -> Result<HttpResponse, PillboxError> {
    let action = body.action.parse::<IntakeAction>().map_err(|_| {
        PillboxError::BadClientData(format!("Invalid intake action provided: {}", body.action))
    })?;

    let intake = match action {
        IntakeAction::Taken => {
            execute(
                MarkIntakeTakenUseCase {
                    intake_id: path_params.intake_id,
                    user_id: path_params.user_id,
                },
                &ctx,
            )
            .await
            .map_err(PillboxError::from)?
        }
        IntakeAction::Skip => {
            execute(
                MarkIntakeSkippedUseCase {
                    intake_id: path_params.intake_id,
                    user_id: path_params.user_id,
                },
                &ctx,
            )
            .await
            .map_err(PillboxError::from)?
        }
        IntakeAction::Snooze { minutes } => {
            execute(
                SnoozeIntakeUseCase {
                    intake_id: path_params.intake_id,
                    user_id: path_params.user_id,
                    minutes,
                },
                &ctx,
            )
            .await
            .map_err(PillboxError::from)?
        }
    };

    Ok(HttpResponse::Ok().json(APIResponse::new(intake)))
}
