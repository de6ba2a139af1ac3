mod inmemory;
mod postgres;

pub use inmemory::InMemoryPendingJobRepo;
pub use postgres::PostgresPendingJobRepo;

use crate::repos::shared::repo::DeleteResult;
use pillbox_domain::{PendingJob, ID};

#[async_trait::async_trait]
pub trait IPendingJobRepo: Send + Sync {
    /// Insert the job, returning the stored row with its assigned id
    async fn insert(&self, job: &PendingJob) -> anyhow::Result<PendingJob>;
    /// Consume up to `limit` jobs with `run_at <= before`, oldest first.
    /// The jobs are deleted before the caller ever attempts delivery, so
    /// each job is delivered at most once and a notifier failure can not
    /// wedge the queue. Errors degrade to an empty batch; the rows are
    /// still there for the next tick.
    async fn delete_all_before(&self, before: i64, limit: i64) -> Vec<PendingJob>;
    /// Drop every live job for the intake. A fresh snooze supersedes
    /// older ones through this.
    async fn delete_by_intake(&self, intake_id: &ID) -> anyhow::Result<DeleteResult>;
    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(user: i64, intake: i64, run_at: i64) -> PendingJob {
        PendingJob::new(ID::from(user), ID::from(intake), run_at, 0)
    }

    #[tokio::test]
    async fn consumes_due_jobs_oldest_first() {
        let repo = InMemoryPendingJobRepo::new();
        for (intake, run_at) in [(1, 300), (2, 100), (3, 200), (4, 999)] {
            repo.insert(&job(7, intake, run_at)).await.unwrap();
        }

        let due = repo.delete_all_before(500, 100).await;
        let order: Vec<i64> = due.iter().map(|job| job.run_at).collect();
        assert_eq!(order, vec![100, 200, 300]);

        // Consumed jobs are gone, the undue one remains
        assert!(repo.delete_all_before(500, 100).await.is_empty());
        assert_eq!(repo.delete_all_before(1_000, 100).await.len(), 1);
    }

    #[tokio::test]
    async fn respects_the_batch_limit() {
        let repo = InMemoryPendingJobRepo::new();
        for run_at in 1..=5 {
            repo.insert(&job(7, run_at, run_at)).await.unwrap();
        }

        let batch = repo.delete_all_before(100, 2).await;
        assert_eq!(
            batch.iter().map(|job| job.run_at).collect::<Vec<_>>(),
            vec![1, 2]
        );
        // The rest stays queued for the next tick
        assert_eq!(repo.delete_all_before(100, 100).await.len(), 3);
    }

    #[tokio::test]
    async fn delete_by_intake_supersedes_older_jobs() {
        let repo = InMemoryPendingJobRepo::new();
        repo.insert(&job(7, 1, 100)).await.unwrap();
        repo.insert(&job(7, 1, 200)).await.unwrap();
        repo.insert(&job(7, 2, 300)).await.unwrap();

        let res = repo.delete_by_intake(&ID::from(1)).await.unwrap();
        assert_eq!(res.deleted_count, 2);

        let remaining = repo.delete_all_before(1_000, 100).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].intake_id, ID::from(2));
    }
}
