use super::IPendingJobRepo;
use crate::repos::shared::repo::DeleteResult;
use pillbox_domain::{PendingJob, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresPendingJobRepo {
    pool: PgPool,
}

impl PostgresPendingJobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PendingJobRaw {
    id: i64,
    user_id: i64,
    intake_id: i64,
    run_at: i64,
    created_at: i64,
}

impl From<PendingJobRaw> for PendingJob {
    fn from(raw: PendingJobRaw) -> Self {
        Self {
            id: raw.id.into(),
            user_id: raw.user_id.into(),
            intake_id: raw.intake_id.into(),
            run_at: raw.run_at,
            created_at: raw.created_at,
        }
    }
}

#[async_trait::async_trait]
impl IPendingJobRepo for PostgresPendingJobRepo {
    async fn insert(&self, job: &PendingJob) -> anyhow::Result<PendingJob> {
        let inserted = sqlx::query_as::<_, PendingJobRaw>(
            r#"
            INSERT INTO pending_jobs
            (user_id, intake_id, run_at, created_at)
            VALUES($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(job.user_id.inner())
        .bind(job.intake_id.inner())
        .bind(job.run_at)
        .bind(job.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(inserted.into())
    }

    async fn delete_all_before(&self, before: i64, limit: i64) -> Vec<PendingJob> {
        let rows = sqlx::query_as::<_, PendingJobRaw>(
            r#"
            DELETE FROM pending_jobs
            WHERE id IN (
                SELECT id FROM pending_jobs
                WHERE run_at <= $1
                ORDER BY run_at ASC
                LIMIT $2
            )
            RETURNING *
            "#,
        )
        .bind(before)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            // The rows survive for the next tick to retry
            error!("Unable to consume due pending jobs. Error: {:?}", e);
            Vec::new()
        });
        let mut consumed = rows.into_iter().map(PendingJob::from).collect::<Vec<_>>();
        // RETURNING has no defined order
        consumed.sort_by_key(|job| job.run_at);
        consumed
    }

    async fn delete_by_intake(&self, intake_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query("DELETE FROM pending_jobs WHERE intake_id = $1")
            .bind(intake_id.inner())
            .execute(&self.pool)
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query("DELETE FROM pending_jobs WHERE user_id = $1")
            .bind(user_id.inner())
            .execute(&self.pool)
            .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
