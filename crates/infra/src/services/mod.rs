mod notifier;

pub use notifier::{INotifier, StubNotifier, WebhookNotifier};
