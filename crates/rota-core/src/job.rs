//! The periodic schedule check.
//!
//! Run about once a week (and on demand), it makes sure the upcoming Friday
//! has a persisted assignment, mirroring it to the external calendar first.
//! Re-running it for a date that is already scheduled is a no-op.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
  Error, Result,
  assignment::{Assignment, NewAssignment},
  calendar::{CalendarMirror, EventTemplate},
  rotation::{next_index, upcoming_friday},
  store::RotaStore,
};

/// What a single run of [`run_schedule_check`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
  /// The target Friday already had an assignment.
  AlreadyScheduled { date: NaiveDate },
  /// The roster is empty; nothing to schedule.
  NoCollaborators { date: NaiveDate },
  /// A new assignment was persisted.
  Scheduled { assignment: Assignment },
  /// The calendar rejected the event; nothing was persisted.
  CalendarFailed { date: NaiveDate },
  /// Another writer claimed the date between the check and the insert.
  Raced {
    date:              NaiveDate,
    orphaned_event_id: Option<String>,
  },
}

/// Schedule the Friday on or after `today` if it has no assignment yet.
///
/// The calendar event is created before the assignment is persisted so the
/// stored row carries the event id. The unique date constraint is the final
/// guard: losing that race yields [`CheckOutcome::Raced`].
pub async fn run_schedule_check<S, C>(
  store:    &S,
  calendar: &C,
  template: &EventTemplate,
  today:    NaiveDate,
) -> Result<CheckOutcome>
where
  S: RotaStore,
  C: CalendarMirror,
{
  let date = upcoming_friday(today);

  if store
    .find_assignment_by_date(date)
    .await
    .map_err(Error::store)?
    .is_some()
  {
    info!(%date, "assignment already exists; skipping");
    return Ok(CheckOutcome::AlreadyScheduled { date });
  }

  let roster = store.list_collaborators().await.map_err(Error::store)?;
  if roster.is_empty() {
    info!(%date, "no collaborators registered; skipping");
    return Ok(CheckOutcome::NoCollaborators { date });
  }

  let last = store.last_assignment().await.map_err(Error::store)?;
  let next = &roster[next_index(&roster, last.as_ref())];
  info!(%date, collaborator_id = next.collaborator_id, "next assignee selected");

  let event_id = match calendar.create_event(template.event(&next.name, date)).await {
    Ok(id) => id,
    Err(e) => {
      warn!(%date, error = %e, "calendar event creation failed; assignment not persisted");
      return Ok(CheckOutcome::CalendarFailed { date });
    }
  };

  let added = store
    .add_assignment(NewAssignment {
      date,
      collaborator_id: next.collaborator_id,
      event_id: event_id.clone(),
    })
    .await
    .map_err(Error::store)?;

  match added {
    Some(assignment) => {
      info!(
        %date,
        assignment_id   = assignment.assignment_id,
        collaborator_id = assignment.collaborator_id,
        "assignment persisted"
      );
      Ok(CheckOutcome::Scheduled { assignment })
    }
    None => {
      warn!(%date, orphaned_event_id = ?event_id, "date was scheduled concurrently; skipping");
      Ok(CheckOutcome::Raced { date, orphaned_event_id: event_id })
    }
  }
}
