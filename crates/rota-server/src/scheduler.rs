//! The weekly trigger for the periodic schedule check.

use chrono::{
  DateTime, Datelike as _, Duration, FixedOffset, NaiveTime, Utc, Weekday,
};
use rota_core::{
  calendar::CalendarMirror,
  job::{CheckOutcome, run_schedule_check},
  store::RotaStore,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::AppState;

/// Run the schedule check once, serialised against every other run.
pub async fn run_check<S, C>(state: &AppState<S, C>) -> rota_core::Result<CheckOutcome>
where
  S: RotaStore,
  C: CalendarMirror,
{
  let _guard = state.job_lock.lock().await;
  run_schedule_check(
    state.store.as_ref(),
    state.calendar.as_ref(),
    &state.config.event,
    state.config.today(),
  )
  .await
}

/// The first `weekday` at `hour:minute` strictly after `now`, in `now`'s
/// offset. `None` if `hour`/`minute` is out of range.
pub fn next_trigger(
  now:     DateTime<FixedOffset>,
  weekday: Weekday,
  hour:    u32,
  minute:  u32,
) -> Option<DateTime<FixedOffset>> {
  let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
  let days_ahead = (weekday.num_days_from_monday() + 7
    - now.weekday().num_days_from_monday())
    % 7;

  let day       = now.date_naive() + Duration::days(days_ahead as i64);
  let candidate = day.and_time(time).and_local_timezone(*now.offset()).single()?;

  if candidate > now {
    Some(candidate)
  } else {
    Some(candidate + Duration::days(7))
  }
}

/// Spawn the loop that sleeps until each configured trigger and runs the
/// check. Failures are logged; the loop keeps going.
pub fn spawn_weekly<S, C>(state: AppState<S, C>) -> JoinHandle<()>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  tokio::spawn(async move {
    let cfg    = state.config.clone();
    let offset = cfg.event.offset();

    loop {
      let now = Utc::now().with_timezone(&offset);
      let Some(next) = next_trigger(now, cfg.job_weekday, cfg.job_hour, cfg.job_minute) else {
        error!(
          hour   = cfg.job_hour,
          minute = cfg.job_minute,
          "invalid job time; weekly schedule check disabled"
        );
        return;
      };

      info!(next_run = %next, "weekly schedule check armed");
      tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

      match run_check(&state).await {
        Ok(outcome) => info!(?outcome, "weekly schedule check finished"),
        Err(e) => error!(error = %e, "weekly schedule check failed"),
      }
    }
  })
}
