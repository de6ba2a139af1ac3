use super::IIntakeRepo;
use crate::repos::shared::query_structs::StatusCounts;
use crate::repos::shared::repo::DeleteResult;
use chrono::NaiveDate;
use pillbox_domain::{Intake, IntakeStatus, Slot, ID};
use sqlx::{FromRow, PgPool};

pub struct PostgresIntakeRepo {
    pool: PgPool,
}

impl PostgresIntakeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IntakeRaw {
    id: i64,
    user_id: i64,
    planned_at: i64,
    planned_day: NaiveDate,
    slot: i16,
    status: String,
    snoozed_until: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl From<IntakeRaw> for Intake {
    fn from(raw: IntakeRaw) -> Self {
        Self {
            id: raw.id.into(),
            user_id: raw.user_id.into(),
            planned_at: raw.planned_at,
            planned_day: raw.planned_day,
            slot: Slot::try_from(raw.slot).unwrap_or(Slot::First),
            status: raw.status.parse().unwrap_or(IntakeStatus::Sent),
            snoozed_until: raw.snoozed_until,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl IIntakeRepo for PostgresIntakeRepo {
    async fn insert(&self, intake: &Intake) -> anyhow::Result<Option<Intake>> {
        // The unique (user_id, slot, planned_day) index turns a duplicate
        // daily creation into a suppressed insert instead of a race.
        let inserted = sqlx::query_as::<_, IntakeRaw>(
            r#"
            INSERT INTO intakes
            (user_id, planned_at, planned_day, slot, status, snoozed_until, created_at, updated_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, slot, planned_day) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(intake.user_id.inner())
        .bind(intake.planned_at)
        .bind(intake.planned_day)
        .bind(intake.slot.number())
        .bind(intake.status.as_str())
        .bind(intake.snoozed_until)
        .bind(intake.created_at)
        .bind(intake.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(inserted.map(|intake| intake.into()))
    }

    async fn find(&self, intake_id: &ID) -> Option<Intake> {
        sqlx::query_as::<_, IntakeRaw>("SELECT * FROM intakes WHERE id = $1")
            .bind(intake_id.inner())
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|intake| intake.into())
    }

    async fn close(
        &self,
        intake_id: &ID,
        user_id: &ID,
        status: IntakeStatus,
        now: i64,
    ) -> anyhow::Result<Option<Intake>> {
        let closed = sqlx::query_as::<_, IntakeRaw>(
            r#"
            UPDATE intakes
            SET status = $3,
                snoozed_until = NULL,
                updated_at = $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(intake_id.inner())
        .bind(user_id.inner())
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(closed.map(|intake| intake.into()))
    }

    async fn set_snoozed_until(
        &self,
        intake_id: &ID,
        user_id: &ID,
        run_at: i64,
        now: i64,
    ) -> anyhow::Result<Option<Intake>> {
        let snoozed = sqlx::query_as::<_, IntakeRaw>(
            r#"
            UPDATE intakes
            SET snoozed_until = $3,
                updated_at = $4
            WHERE id = $1 AND user_id = $2 AND status = 'sent'
            RETURNING *
            "#,
        )
        .bind(intake_id.inner())
        .bind(user_id.inner())
        .bind(run_at)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(snoozed.map(|intake| intake.into()))
    }

    async fn status_counts_since(&self, user_id: &ID, since: i64) -> anyhow::Result<StatusCounts> {
        #[derive(Debug, FromRow)]
        struct StatusCountRaw {
            status: String,
            count: i64,
        }

        let rows = sqlx::query_as::<_, StatusCountRaw>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM intakes
            WHERE user_id = $1 AND created_at >= $2 AND status IN ('taken', 'skip')
            GROUP BY status
            "#,
        )
        .bind(user_id.inner())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for row in rows {
            match row.status.as_str() {
                "taken" => counts.taken = row.count,
                "skip" => counts.skipped = row.count,
                _ => (),
            }
        }
        Ok(counts)
    }

    async fn find_last_updated(&self, user_id: &ID) -> Option<Intake> {
        sqlx::query_as::<_, IntakeRaw>(
            "SELECT * FROM intakes WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(user_id.inner())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|intake| intake.into())
    }

    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query("DELETE FROM intakes WHERE user_id = $1")
            .bind(user_id.inner())
            .execute(&self.pool)
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
