use super::IPendingJobRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use pillbox_domain::{PendingJob, ID};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

pub struct InMemoryPendingJobRepo {
    jobs: Mutex<Vec<PendingJob>>,
    next_id: AtomicI64,
}

impl InMemoryPendingJobRepo {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait::async_trait]
impl IPendingJobRepo for InMemoryPendingJobRepo {
    async fn insert(&self, job: &PendingJob) -> anyhow::Result<PendingJob> {
        let mut stored = job.clone();
        stored.id = ID::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        insert(&stored, &self.jobs);
        Ok(stored)
    }

    async fn delete_all_before(&self, before: i64, limit: i64) -> Vec<PendingJob> {
        let mut due = find_by(&self.jobs, |job: &PendingJob| job.run_at <= before);
        due.sort_by_key(|job| job.run_at);
        due.truncate(limit.max(0) as usize);

        let consumed: HashSet<ID> = due.iter().map(|job| job.id).collect();
        delete_by(&self.jobs, |job: &PendingJob| consumed.contains(&job.id));
        due
    }

    async fn delete_by_intake(&self, intake_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.jobs, |job: &PendingJob| {
            job.intake_id == *intake_id
        }))
    }

    async fn delete_by_user(&self, user_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.jobs, |job: &PendingJob| {
            job.user_id == *user_id
        }))
    }
}
