//! Assignments and the reconciled schedule view.
//!
//! An [`Assignment`] is a persisted `(date, collaborator)` pairing. A
//! [`Slot`] is one entry of the upcoming schedule: either an assignment that
//! already exists, or a [`Placeholder`] computed on the fly and never stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A persisted Friday assignment. At most one exists per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub assignment_id:   i64,
  pub date:            NaiveDate,
  pub collaborator_id: i64,
  /// Identifier of the mirrored external calendar event, if one was created.
  pub event_id:        Option<String>,
  pub created_at:      DateTime<Utc>,
}

/// Input for [`RotaStore::add_assignment`](crate::store::RotaStore::add_assignment).
#[derive(Debug, Clone)]
pub struct NewAssignment {
  pub date:            NaiveDate,
  pub collaborator_id: i64,
  pub event_id:        Option<String>,
}

/// A provisional future assignment computed by the reconciler.
///
/// `id` is synthetic and always negative so it can never collide with a
/// persisted assignment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
  pub id:              i64,
  pub date:            NaiveDate,
  pub collaborator_id: i64,
}

/// One upcoming Friday in the schedule view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
  Persisted(Assignment),
  Generated(Placeholder),
}

impl Slot {
  pub fn date(&self) -> NaiveDate {
    match self {
      Slot::Persisted(a) => a.date,
      Slot::Generated(p) => p.date,
    }
  }

  pub fn collaborator_id(&self) -> i64 {
    match self {
      Slot::Persisted(a) => a.collaborator_id,
      Slot::Generated(p) => p.collaborator_id,
    }
  }

  pub fn is_generated(&self) -> bool { matches!(self, Slot::Generated(_)) }
}

/// Output of [`reconcile`](crate::rotation::reconcile).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleView {
  /// Persisted assignments dated before today, most recent first.
  pub past:   Vec<Assignment>,
  /// Exactly the next K Fridays after today, in chronological order.
  pub future: Vec<Slot>,
}
