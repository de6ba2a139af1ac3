use crate::{error::PillboxError, shared::usecase::UseCase};
use actix_web::{web, HttpResponse};
use pillbox_api_structs::dtos::{IntakeDTO, JournalStatsDTO};
use pillbox_api_structs::get_journal::{APIResponse, PathParams};
use pillbox_domain::{Intake, ID};
use pillbox_infra::PillboxContext;

pub async fn get_journal_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<PillboxContext>,
) -> Result<HttpResponse, PillboxError> {
    let usecase = GetJournalUseCase {
        user_id: path_params.user_id,
    };

    crate::shared::usecase::execute(usecase, &ctx)
        .await
        .map(|stats| {
            HttpResponse::Ok().json(APIResponse {
                stats: JournalStatsDTO {
                    taken: stats.taken,
                    skipped: stats.skipped,
                    adherence: stats.adherence,
                    last_intake: stats.last.map(IntakeDTO::new),
                },
            })
        })
        .map_err(PillboxError::from)
}

/// Adherence over the trailing report window, counting only closed
/// intakes. Open (sent) intakes are not held against the user.
#[derive(Debug)]
pub struct GetJournalUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub struct JournalStats {
    pub taken: i64,
    pub skipped: i64,
    /// Percentage in [0, 100]; 0 when nothing was closed in the window
    pub adherence: f64,
    pub last: Option<Intake>,
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
impl UseCase for GetJournalUseCase {
    type Response = JournalStats;

    type Error = UseCaseError;

    const NAME: &'static str = "GetJournal";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let since = now - ctx.config.journal_window_millis;

        let counts = ctx
            .repos
            .intakes
            .status_counts_since(&self.user_id, since)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let closed = counts.taken + counts.skipped;
        let adherence = if closed > 0 {
            counts.taken as f64 / closed as f64 * 100.0
        } else {
            0.0
        };
        let last = ctx.repos.intakes.find_last_updated(&self.user_id).await;

        Ok(JournalStats {
            taken: counts.taken,
            skipped: counts.skipped,
            adherence,
            last,
        })
    }
}
