mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IIntakeRepo, IPendingJobRepo, IUserRepo, Repos, StatusCounts};
pub use services::{INotifier, StubNotifier, WebhookNotifier};
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

/// Explicitly constructed, cloneable bundle of everything the use cases
/// depend on: repositories, configuration, the clock and the notifier.
#[derive(Clone)]
pub struct PillboxContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl PillboxContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let notifier = Arc::new(WebhookNotifier::new(&config));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifier,
        }
    }

    /// Context backed by in-memory repositories and a recording notifier.
    /// Used by tests.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(StubNotifier::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> PillboxContext {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    let postgres_connection_string = std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING));

    PillboxContext::create(ContextParams {
        postgres_connection_string,
    })
    .await
}
