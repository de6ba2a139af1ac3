use crate::shared::usecase::UseCase;
use chrono::Timelike;
use pillbox_domain::{
    time::{local_now, resolve_today},
    Intake, Slot, TimeOfDay,
};
use pillbox_infra::PillboxContext;
use tracing::error;

/// One execution of the periodic scheduling pass: first re-deliver due
/// snoozed reminders, then detect newly-due daily slots.
///
/// Invocations must never overlap; `start_scheduler_tick_job` runs them
/// back to back on a single task.
#[derive(Debug)]
pub struct SchedulerTickUseCase;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Snoozed reminders delivered from consumed pending jobs
    pub redelivered: usize,
    /// Pending jobs dropped because their intake was already closed
    pub discarded: usize,
    /// Intakes created (and delivered) by the due-slot scan
    pub created: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SchedulerTickUseCase {
    type Response = TickReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SchedulerTick";

    async fn execute(&mut self, ctx: &PillboxContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut report = TickReport::default();

        // Pass 1: consume due pending jobs. The repo deletes them up
        // front, so delivery is attempted at most once per job and a
        // notifier failure can not wedge the queue.
        let due_jobs = ctx
            .repos
            .pending_jobs
            .delete_all_before(now, ctx.config.pending_jobs_batch_size)
            .await;
        for job in due_jobs {
            let intake = match ctx.repos.intakes.find(&job.intake_id).await {
                Some(intake) => intake,
                None => continue,
            };
            if intake.status.is_closed() {
                // The user acted before the snooze elapsed
                report.discarded += 1;
                continue;
            }
            if let Err(e) = ctx
                .notifier
                .deliver(&job.user_id, &intake.id, intake.slot)
                .await
            {
                error!(
                    "Failed to re-deliver snoozed reminder for intake: {} Error: {:?}",
                    intake.id, e
                );
            }
            report.redelivered += 1;
        }

        // Pass 2: scan for newly-due daily slots
        let users = ctx
            .repos
            .users
            .find_all()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for user in users {
            if !user.reminders_enabled {
                continue;
            }
            let local_now = match local_now(&user.timezone, now) {
                Some(local_now) => local_now,
                None => continue,
            };

            for slot in Slot::all() {
                // Malformed slot config disables the slot, never the tick
                let time: TimeOfDay = match user.slot_time(slot).parse() {
                    Ok(time) => time,
                    Err(_) => continue,
                };
                if local_now.hour() != time.hours() || local_now.minute() != time.minutes() {
                    continue;
                }
                // Only the first tick landing in the due minute fires; the
                // unique (user, slot, day) constraint behind insert is the
                // second, independent defense against double delivery.
                if local_now.second() >= ctx.config.tick_interval_secs {
                    continue;
                }

                let planned_at = match resolve_today(&user.timezone, &time, now) {
                    Some(planned_at) => planned_at,
                    None => continue,
                };
                let intake = Intake::new(user.id, slot, planned_at, local_now.date_naive(), now);
                let intake = match ctx
                    .repos
                    .intakes
                    .insert(&intake)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?
                {
                    Some(intake) => intake,
                    // Already created today, e.g. by the previous tick
                    None => continue,
                };

                if let Err(e) = ctx.notifier.deliver(&user.id, &intake.id, slot).await {
                    error!(
                        "Failed to deliver reminder for intake: {} Error: {:?}",
                        intake.id, e
                    );
                }
                report.created += 1;
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::snooze_intake::SnoozeIntakeUseCase;
    use chrono::{TimeZone, Utc};
    use pillbox_domain::{IntakeStatus, User, ID};
    use pillbox_infra::{ISys, StubNotifier};
    use std::sync::Arc;

    struct StaticTimeSys(i64);
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    fn ts(h: u32, m: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(2026, 3, 3, h, m, s)
            .unwrap()
            .timestamp_millis()
    }

    fn setup() -> (PillboxContext, Arc<StubNotifier>) {
        let mut ctx = PillboxContext::create_inmemory();
        let notifier = Arc::new(StubNotifier::new());
        ctx.notifier = notifier.clone();
        (ctx, notifier)
    }

    async fn tick_at(ctx: &mut PillboxContext, now: i64) -> TickReport {
        ctx.sys = Arc::new(StaticTimeSys(now));
        SchedulerTickUseCase.execute(ctx).await.unwrap()
    }

    async fn insert_user(ctx: &PillboxContext, id: i64) -> User {
        let user = User::new(ID::from(id), chrono_tz::UTC);
        ctx.repos.users.insert(&user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn fires_each_due_slot_once_per_day() {
        let (mut ctx, notifier) = setup();
        let user = insert_user(&ctx, 7).await;

        // First tick inside the due minute creates and delivers
        let report = tick_at(&mut ctx, ts(9, 0, 5)).await;
        assert_eq!(report.created, 1);
        let deliveries = notifier.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, user.id);
        assert_eq!(deliveries[0].2, Slot::First);

        let intake = ctx.repos.intakes.find(&deliveries[0].1).await.unwrap();
        assert_eq!(intake.status, IntakeStatus::Sent);
        assert_eq!(intake.planned_at, ts(9, 0, 0));

        // Second tick in the same minute: suppressed by the daily constraint
        let report = tick_at(&mut ctx, ts(9, 0, 20)).await;
        assert_eq!(report.created, 0);
        assert_eq!(notifier.deliveries().len(), 1);

        // Past the window: suppressed by the gate as well
        let report = tick_at(&mut ctx, ts(9, 0, 35)).await;
        assert_eq!(report.created, 0);
        assert_eq!(notifier.deliveries().len(), 1);

        // The second slot fires independently later that day
        let report = tick_at(&mut ctx, ts(21, 0, 3)).await;
        assert_eq!(report.created, 1);
        assert_eq!(notifier.deliveries().len(), 2);
        assert_eq!(notifier.deliveries()[1].2, Slot::Second);
    }

    #[tokio::test]
    async fn does_not_fire_outside_the_due_window() {
        let (mut ctx, notifier) = setup();
        insert_user(&ctx, 7).await;

        // A tick landing late in the due minute never fires, even though
        // no intake exists yet for the day
        let report = tick_at(&mut ctx, ts(9, 0, 35)).await;
        assert_eq!(report.created, 0);
        assert!(notifier.deliveries().is_empty());

        // And neither does any other minute
        let report = tick_at(&mut ctx, ts(9, 1, 5)).await;
        assert_eq!(report.created, 0);
        assert!(notifier.deliveries().is_empty());
    }

    #[tokio::test]
    async fn skips_disabled_users_and_malformed_slot_times() {
        let (mut ctx, notifier) = setup();

        let mut disabled = User::new(ID::from(1), chrono_tz::UTC);
        disabled.reminders_enabled = false;
        ctx.repos.users.insert(&disabled).await.unwrap();

        let mut malformed = User::new(ID::from(2), chrono_tz::UTC);
        malformed.slot1_time = "9am".into();
        ctx.repos.users.insert(&malformed).await.unwrap();

        let report = tick_at(&mut ctx, ts(9, 0, 5)).await;
        assert_eq!(report.created, 0);
        assert!(notifier.deliveries().is_empty());

        // The malformed slot is skipped silently, the other still fires
        let report = tick_at(&mut ctx, ts(21, 0, 5)).await;
        assert_eq!(report.created, 1);
        assert_eq!(notifier.deliveries()[0].0, ID::from(2));
    }

    #[tokio::test]
    async fn honours_the_users_timezone() {
        let (mut ctx, notifier) = setup();
        let user = User::new(ID::from(7), chrono_tz::Europe::Berlin);
        ctx.repos.users.insert(&user).await.unwrap();

        // 09:00 UTC is 10:00 in Berlin (CET, early March): not due
        let report = tick_at(&mut ctx, ts(9, 0, 5)).await;
        assert_eq!(report.created, 0);

        // 08:00 UTC is 09:00 in Berlin: due
        let report = tick_at(&mut ctx, ts(8, 0, 5)).await;
        assert_eq!(report.created, 1);
        let intake = ctx
            .repos
            .intakes
            .find(&notifier.deliveries()[0].1)
            .await
            .unwrap();
        assert_eq!(intake.planned_at, ts(8, 0, 0));
    }

    #[tokio::test]
    async fn redelivers_due_snoozed_reminders_exactly_once() {
        let (mut ctx, notifier) = setup();
        let user = insert_user(&ctx, 7).await;

        tick_at(&mut ctx, ts(9, 0, 5)).await;
        let intake_id = notifier.deliveries()[0].1;

        ctx.sys = Arc::new(StaticTimeSys(ts(9, 2, 0)));
        SnoozeIntakeUseCase {
            intake_id,
            user_id: user.id,
            minutes: 10,
        }
        .execute(&ctx)
        .await
        .unwrap();

        // Not due yet
        let report = tick_at(&mut ctx, ts(9, 11, 59)).await;
        assert_eq!(report.redelivered, 0);
        assert_eq!(notifier.deliveries().len(), 1);

        // Due: delivered and consumed
        let report = tick_at(&mut ctx, ts(9, 12, 0)).await;
        assert_eq!(report.redelivered, 1);
        assert_eq!(notifier.deliveries().len(), 2);
        assert_eq!(notifier.deliveries()[1].1, intake_id);

        // Consumed jobs do not fire twice
        let report = tick_at(&mut ctx, ts(9, 13, 0)).await;
        assert_eq!(report.redelivered, 0);
        assert_eq!(notifier.deliveries().len(), 2);
    }

    #[tokio::test]
    async fn discards_jobs_for_closed_intakes_silently() {
        let (mut ctx, notifier) = setup();
        let user = insert_user(&ctx, 7).await;

        tick_at(&mut ctx, ts(9, 0, 5)).await;
        let intake_id = notifier.deliveries()[0].1;

        ctx.sys = Arc::new(StaticTimeSys(ts(9, 2, 0)));
        SnoozeIntakeUseCase {
            intake_id,
            user_id: user.id,
            minutes: 10,
        }
        .execute(&ctx)
        .await
        .unwrap();

        // The user acts before the snooze elapses
        ctx.repos
            .intakes
            .close(&intake_id, &user.id, IntakeStatus::Taken, ts(9, 5, 0))
            .await
            .unwrap()
            .unwrap();

        let report = tick_at(&mut ctx, ts(9, 20, 0)).await;
        assert_eq!(report.discarded, 1);
        assert_eq!(report.redelivered, 0);
        assert_eq!(notifier.deliveries().len(), 1);

        // The job was consumed, not kept around
        let report = tick_at(&mut ctx, ts(9, 21, 0)).await;
        assert_eq!(report.discarded, 0);
    }

    #[tokio::test]
    async fn repeated_snooze_leaves_a_single_live_job() {
        let (mut ctx, notifier) = setup();
        let user = insert_user(&ctx, 7).await;

        tick_at(&mut ctx, ts(9, 0, 5)).await;
        let intake_id = notifier.deliveries()[0].1;

        for minutes in [10, 30] {
            ctx.sys = Arc::new(StaticTimeSys(ts(9, 2, 0)));
            SnoozeIntakeUseCase {
                intake_id,
                user_id: user.id,
                minutes,
            }
            .execute(&ctx)
            .await
            .unwrap();
        }

        // The first snooze was superseded by the second
        let report = tick_at(&mut ctx, ts(9, 12, 0)).await;
        assert_eq!(report.redelivered, 0);

        let report = tick_at(&mut ctx, ts(9, 32, 0)).await;
        assert_eq!(report.redelivered, 1);
        assert_eq!(notifier.deliveries().len(), 2);
    }
}
