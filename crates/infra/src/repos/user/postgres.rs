use super::IUserRepo;
use pillbox_domain::{User, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    id: i64,
    timezone: String,
    reminders_enabled: bool,
    slot1_time: String,
    slot2_time: String,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.id.into(),
            // Rows are written through the validated settings path; an
            // unparseable value left behind by hand edits degrades to UTC.
            timezone: raw.timezone.parse().unwrap_or(chrono_tz::UTC),
            reminders_enabled: raw.reminders_enabled,
            slot1_time: raw.slot1_time,
            slot2_time: raw.slot2_time,
        }
    }
}

const USER_COLUMNS: &str = "id, timezone, reminders_enabled, slot1_time, slot2_time";

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (id, timezone, reminders_enabled, slot1_time, slot2_time)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(user.id.inner())
        .bind(user.timezone.name())
        .bind(user.reminders_enabled)
        .bind(&user.slot1_time)
        .bind(&user.slot2_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET timezone = $2,
                reminders_enabled = $3,
                slot1_time = $4,
                slot2_time = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.inner())
        .bind(user.timezone.name())
        .bind(user.reminders_enabled)
        .bind(&user.slot1_time)
        .bind(&user.slot2_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|user| user.into())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, UserRaw>(&format!("SELECT {} FROM users", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(users.into_iter().map(|user| user.into()).collect())
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|user| user.into())
    }
}
