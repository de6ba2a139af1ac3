use crate::intake::scheduler_tick::SchedulerTickUseCase;
use crate::shared::usecase::execute;
use pillbox_infra::PillboxContext;
use std::time::Duration;
use tokio::time::{interval_at, Instant};

/// Milliseconds until the next tick boundary, so ticks land on whole
/// periods of the wall clock (e.g. :00 and :30 for a 30s period).
pub fn get_start_delay(now_ts_millis: i64, period_secs: u64) -> u64 {
    let period_millis = period_secs * 1000;
    let remainder = (now_ts_millis as u64) % period_millis;
    if remainder == 0 {
        0
    } else {
        period_millis - remainder
    }
}

/// Runs the scheduling tick forever on a single task. Each tick is
/// awaited before the next one starts, so two scans can never overlap
/// even when one runs long.
pub fn start_scheduler_tick_job(ctx: PillboxContext) {
    let period_secs = ctx.config.tick_interval_secs as u64;
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let start_delay = Duration::from_millis(get_start_delay(now, period_secs));
        let mut tick_interval =
            interval_at(Instant::now() + start_delay, Duration::from_secs(period_secs));

        loop {
            tick_interval.tick().await;
            // Errors are already logged by the usecase wrapper; the
            // loop keeps going regardless
            let _ = execute(SchedulerTickUseCase, &ctx).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_delay_aligns_to_period_boundaries() {
        assert_eq!(get_start_delay(0, 30), 0);
        assert_eq!(get_start_delay(30_000, 30), 0);
        assert_eq!(get_start_delay(1, 30), 29_999);
        assert_eq!(get_start_delay(29_999, 30), 1);
        assert_eq!(get_start_delay(45_000, 30), 15_000);
        assert_eq!(get_start_delay(61_000, 60), 59_000);
    }
}
