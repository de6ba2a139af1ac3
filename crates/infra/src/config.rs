use chrono_tz::Tz;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Period of the scheduler tick in seconds. Also the width of the
    /// due-minute window: a slot fires only while the user-local second
    /// hand is below this value, so one minute holds exactly one window.
    pub tick_interval_secs: u32,
    /// Maximum number of pending jobs consumed per tick, so a large
    /// backlog cannot stall the due-slot scan.
    pub pending_jobs_batch_size: i64,
    /// Trailing window for adherence reporting, in millis
    pub journal_window_millis: i64,
    /// Timezone assigned to users seen for the first time
    pub default_timezone: Tz,
    /// Where reminder deliveries are POSTed. When unset, deliveries are
    /// dropped with a debug log.
    pub webhook_url: Option<String>,
    /// Shared secret sent along with every webhook delivery
    pub webhook_key: String,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let default_timezone = match std::env::var("DEFAULT_TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given DEFAULT_TIMEZONE: {} is not a valid IANA timezone, falling back to UTC.",
                        tz
                    );
                    chrono_tz::UTC
                }
            },
            Err(_) => chrono_tz::UTC,
        };

        let tick_interval_secs = std::env::var("TICK_INTERVAL_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u32>().ok())
            .filter(|secs| (1..=60).contains(secs))
            .unwrap_or(30);

        let webhook_url = std::env::var("WEBHOOK_URL").ok();
        let webhook_key = match std::env::var("WEBHOOK_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find WEBHOOK_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Webhook key was generated and set to: {}", key);
                key
            }
        };

        Self {
            port,
            tick_interval_secs,
            pending_jobs_batch_size: 100,
            journal_window_millis: 1000 * 60 * 60 * 24 * 7, // 7 days
            default_timezone,
            webhook_url,
            webhook_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
