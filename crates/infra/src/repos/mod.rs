mod intake;
mod pending_job;
mod shared;
mod user;

use intake::{InMemoryIntakeRepo, PostgresIntakeRepo};
use pending_job::{InMemoryPendingJobRepo, PostgresPendingJobRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use user::{InMemoryUserRepo, PostgresUserRepo};

pub use intake::IIntakeRepo;
pub use pending_job::IPendingJobRepo;
pub use shared::query_structs::StatusCounts;
pub use shared::repo::DeleteResult;
pub use user::IUserRepo;

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub intakes: Arc<dyn IIntakeRepo>,
    pub pending_jobs: Arc<dyn IPendingJobRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            intakes: Arc::new(PostgresIntakeRepo::new(pool.clone())),
            pending_jobs: Arc::new(PostgresPendingJobRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            intakes: Arc::new(InMemoryIntakeRepo::new()),
            pending_jobs: Arc::new(InMemoryPendingJobRepo::new()),
        }
    }
}
