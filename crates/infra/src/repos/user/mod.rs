mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;

use pillbox_domain::{User, ID};

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    /// Insert the user config, doing nothing when a config with the same
    /// id already exists. User ids come from the external transport, so
    /// two "first contacts" can race.
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    /// All user configs, enabled or not. The scheduler tick scans these.
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    async fn delete(&self, user_id: &ID) -> Option<User>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{Europe::Berlin, UTC};
    use pillbox_domain::Slot;

    #[tokio::test]
    async fn insert_is_idempotent_per_id() {
        let repo = InMemoryUserRepo::new();
        let user = User::new(ID::from(7), Berlin);
        repo.insert(&user).await.unwrap();

        let mut duplicate = User::new(ID::from(7), UTC);
        duplicate.reminders_enabled = false;
        repo.insert(&duplicate).await.unwrap();

        // First write wins, second insert is a no-op
        let found = repo.find(&user.id).await.unwrap();
        assert_eq!(found.timezone, Berlin);
        assert!(found.reminders_enabled);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_updates_settings() {
        let repo = InMemoryUserRepo::new();
        let mut user = User::new(ID::from(3), UTC);
        repo.insert(&user).await.unwrap();

        user.set_slot_time(Slot::First, &"08:15".parse().unwrap());
        user.reminders_enabled = false;
        repo.save(&user).await.unwrap();

        let found = repo.find(&user.id).await.unwrap();
        assert_eq!(found.slot_time(Slot::First), "08:15");
        assert!(!found.reminders_enabled);
    }

    #[tokio::test]
    async fn delete_removes_the_user() {
        let repo = InMemoryUserRepo::new();
        let user = User::new(ID::from(5), UTC);
        repo.insert(&user).await.unwrap();

        assert!(repo.delete(&user.id).await.is_some());
        assert!(repo.find(&user.id).await.is_none());
        assert!(repo.delete(&user.id).await.is_none());
    }
}
