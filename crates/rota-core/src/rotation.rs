//! The Friday rotation.
//!
//! [`reconcile`] merges persisted assignments with generated placeholders to
//! produce the schedule view. It performs no I/O: callers take a snapshot of
//! the roster and the assignment set and pass "today" explicitly.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::warn;

use crate::{
  assignment::{Assignment, Placeholder, ScheduleView, Slot},
  collaborator::Collaborator,
};

/// Number of upcoming Fridays shown in the schedule view by default.
pub const DEFAULT_HORIZON: usize = 10;

fn days_until_friday(date: NaiveDate) -> i64 {
  let today  = date.weekday().num_days_from_monday() as i64;
  let friday = Weekday::Fri.num_days_from_monday() as i64;
  (friday - today).rem_euclid(7)
}

/// The Friday the periodic check targets: `today` itself if it is a Friday,
/// otherwise the next one.
pub fn upcoming_friday(today: NaiveDate) -> NaiveDate {
  today + Duration::days(days_until_friday(today))
}

/// The next `count` Fridays strictly after `today`, in chronological order.
///
/// Stops early at the end of the representable calendar.
pub fn fridays_after(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
  let first = match days_until_friday(today) {
    0 => today.checked_add_signed(Duration::days(7)),
    n => today.checked_add_signed(Duration::days(n)),
  };
  std::iter::successors(first, |d| d.checked_add_signed(Duration::weeks(1)))
    .take(count)
    .collect()
}

/// Roster position of whoever follows `last` in the rotation.
///
/// With no history the rotation starts at the head of the roster. If the
/// last assignee is no longer on the roster their position is unknown and the
/// rotation restarts at 0.
pub fn next_index(roster: &[Collaborator], last: Option<&Assignment>) -> usize {
  let Some(last) = last else { return 0 };
  if roster.is_empty() {
    return 0;
  }
  match roster
    .iter()
    .position(|c| c.collaborator_id == last.collaborator_id)
  {
    Some(i) => (i + 1) % roster.len(),
    None => {
      warn!(
        assignment_id   = last.assignment_id,
        collaborator_id = last.collaborator_id,
        "last assignee is no longer on the roster; restarting rotation at index 0"
      );
      0
    }
  }
}

/// Compute the past/future schedule view.
///
/// - `past` holds persisted assignments dated before `today`, newest first.
/// - `future` holds one slot per Friday in [`fridays_after`]`(today, horizon)`.
///   A Friday with a persisted assignment yields that assignment unchanged;
///   any other Friday yields a placeholder for
///   `roster[(next_index + offset) % roster.len()]`, where `offset` is the
///   Friday's position in the enumeration. The offset counts every slot, not
///   only generated ones, so placeholders stay in lock-step with the
///   calendar.
///
/// An empty roster produces an empty `future`. Assignments whose date is not
/// an enumerated Friday never appear in `future`.
pub fn reconcile(
  roster:      &[Collaborator],
  assignments: &[Assignment],
  today:       NaiveDate,
  horizon:     usize,
) -> ScheduleView {
  let (mut past, upcoming): (Vec<Assignment>, Vec<Assignment>) = assignments
    .iter()
    .cloned()
    .partition(|a| a.date < today);
  past.sort_by(|a, b| b.date.cmp(&a.date));

  if roster.is_empty() {
    return ScheduleView { past, future: Vec::new() };
  }

  let last  = assignments.iter().max_by_key(|a| a.date);
  let start = next_index(roster, last);

  let future = fridays_after(today, horizon)
    .into_iter()
    .enumerate()
    .map(|(offset, date)| {
      match upcoming.iter().find(|a| a.date == date) {
        Some(existing) => Slot::Persisted(existing.clone()),
        None => Slot::Generated(Placeholder {
          id: -(offset as i64 + 1),
          date,
          collaborator_id: roster[(start + offset) % roster.len()].collaborator_id,
        }),
      }
    })
    .collect();

  ScheduleView { past, future }
}
