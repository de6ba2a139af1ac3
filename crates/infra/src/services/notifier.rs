use crate::config::Config;
use pillbox_domain::{Slot, ID};
use std::sync::Mutex;
use tracing::debug;

/// Outbound reminder delivery. The engine never retries a failed
/// delivery; callers log the error and move on.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn deliver(&self, user_id: &ID, intake_id: &ID, slot: Slot) -> anyhow::Result<()>;
}

/// Delivers reminders by POSTing them to the configured webhook, which is
/// expected to render the message and action buttons for the user.
pub struct WebhookNotifier {
    url: Option<String>,
    key: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &Config) -> Self {
        // The scheduler tick awaits deliveries, so a stalled webhook
        // must time out instead of blocking the loop
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build the webhook http client");
        Self {
            url: config.webhook_url.clone(),
            key: config.webhook_key.clone(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn deliver(&self, user_id: &ID, intake_id: &ID, slot: Slot) -> anyhow::Result<()> {
        let url = match &self.url {
            Some(url) => url,
            None => {
                debug!(
                    "No webhook url configured, dropping reminder for intake: {}",
                    intake_id
                );
                return Ok(());
            }
        };

        self.client
            .post(url)
            .header("pillbox-webhook-key", &self.key)
            .json(&serde_json::json!({
                "userId": user_id,
                "intakeId": intake_id,
                "slot": slot.number(),
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Records deliveries instead of sending them. Default notifier of the
/// in-memory context.
pub struct StubNotifier {
    deliveries: Mutex<Vec<(ID, ID, Slot)>>,
}

impl StubNotifier {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<(ID, ID, Slot)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl Default for StubNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifier for StubNotifier {
    async fn deliver(&self, user_id: &ID, intake_id: &ID, slot: Slot) -> anyhow::Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((*user_id, *intake_id, slot));
        Ok(())
    }
}
