//! In-memory doubles for the store and calendar traits, used by unit tests.

use std::{convert::Infallible, sync::Mutex};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::{
  assignment::{Assignment, NewAssignment},
  calendar::{CalendarEvent, CalendarMirror},
  collaborator::{Collaborator, NewCollaborator, Role},
  store::RotaStore,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn epoch() -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() }

/// Collaborators with ids `1..=names.len()`, created one minute apart.
pub fn roster(names: &[&str]) -> Vec<Collaborator> {
  names
    .iter()
    .enumerate()
    .map(|(i, name)| Collaborator {
      collaborator_id: i as i64 + 1,
      name:            name.to_string(),
      email:           format!("{}@example.com", name.to_lowercase()),
      password_hash:   String::new(),
      role:            Role::Member,
      created_at:      epoch() + Duration::minutes(i as i64),
    })
    .collect()
}

pub fn assignment(id: i64, date: NaiveDate, collaborator_id: i64) -> Assignment {
  Assignment {
    assignment_id: id,
    date,
    collaborator_id,
    event_id: None,
    created_at: epoch(),
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Inner {
  collaborators: Vec<Collaborator>,
  assignments:   Vec<Assignment>,
  next_id:       i64,
}

/// A `RotaStore` over two vectors.
///
/// With `blind_lookups` set, `find_assignment_by_date` always misses, which
/// simulates a concurrent writer claiming the date between check and insert.
#[derive(Default)]
pub struct MemoryStore {
  inner:             Mutex<Inner>,
  pub blind_lookups: bool,
}

impl MemoryStore {
  pub fn with_roster(names: &[&str]) -> Self {
    let store = Self::default();
    {
      let mut inner = store.inner.lock().unwrap();
      inner.collaborators = roster(names);
      inner.next_id = 100;
    }
    store
  }

  pub fn insert(&self, a: Assignment) {
    self.inner.lock().unwrap().assignments.push(a);
  }

  pub fn assignments(&self) -> Vec<Assignment> {
    let mut all = self.inner.lock().unwrap().assignments.clone();
    all.sort_by_key(|a| a.date);
    all
  }
}

impl RotaStore for MemoryStore {
  type Error = Infallible;

  async fn add_collaborator(&self, input: NewCollaborator) -> Result<Option<Collaborator>, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    if inner.collaborators.iter().any(|c| c.email == input.email) {
      return Ok(None);
    }
    inner.next_id += 1;
    let c = Collaborator {
      collaborator_id: inner.next_id,
      name:            input.name,
      email:           input.email,
      password_hash:   input.password_hash,
      role:            input.role,
      created_at:      Utc::now(),
    };
    inner.collaborators.push(c.clone());
    Ok(Some(c))
  }

  async fn get_collaborator(&self, id: i64) -> Result<Option<Collaborator>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.collaborators.iter().find(|c| c.collaborator_id == id).cloned())
  }

  async fn find_collaborator_by_email(&self, email: String) -> Result<Option<Collaborator>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.collaborators.iter().find(|c| c.email == email).cloned())
  }

  async fn list_collaborators(&self) -> Result<Vec<Collaborator>, Infallible> {
    let mut all = self.inner.lock().unwrap().collaborators.clone();
    all.sort_by_key(|c| (c.created_at, c.collaborator_id));
    Ok(all)
  }

  async fn delete_collaborator(&self, id: i64) -> Result<bool, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    let before = inner.collaborators.len();
    inner.collaborators.retain(|c| c.collaborator_id != id);
    Ok(inner.collaborators.len() != before)
  }

  async fn set_collaborator_role(&self, id: i64, role: Role) -> Result<Option<Collaborator>, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    Ok(
      inner
        .collaborators
        .iter_mut()
        .find(|c| c.collaborator_id == id)
        .map(|c| {
          c.role = role;
          c.clone()
        }),
    )
  }

  async fn add_assignment(&self, input: NewAssignment) -> Result<Option<Assignment>, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    if inner.assignments.iter().any(|a| a.date == input.date) {
      return Ok(None);
    }
    inner.next_id += 1;
    let a = Assignment {
      assignment_id:   inner.next_id,
      date:            input.date,
      collaborator_id: input.collaborator_id,
      event_id:        input.event_id,
      created_at:      Utc::now(),
    };
    inner.assignments.push(a.clone());
    Ok(Some(a))
  }

  async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.assignments.iter().find(|a| a.assignment_id == id).cloned())
  }

  async fn find_assignment_by_date(&self, date: NaiveDate) -> Result<Option<Assignment>, Infallible> {
    if self.blind_lookups {
      return Ok(None);
    }
    let inner = self.inner.lock().unwrap();
    Ok(inner.assignments.iter().find(|a| a.date == date).cloned())
  }

  async fn list_assignments(&self) -> Result<Vec<Assignment>, Infallible> {
    Ok(self.assignments())
  }

  async fn last_assignment(&self) -> Result<Option<Assignment>, Infallible> {
    Ok(self.assignments().pop())
  }

  async fn set_assignment_collaborator(
    &self,
    id: i64,
    collaborator_id: i64,
  ) -> Result<Option<Assignment>, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    Ok(
      inner
        .assignments
        .iter_mut()
        .find(|a| a.assignment_id == id)
        .map(|a| {
          a.collaborator_id = collaborator_id;
          a.clone()
        }),
    )
  }
}

// ─── Calendar ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("calendar unavailable")]
pub struct CalendarDown;

/// Records every call. With `fail` set, every call errors.
#[derive(Default)]
pub struct RecordingCalendar {
  pub created: Mutex<Vec<CalendarEvent>>,
  pub updated: Mutex<Vec<(String, String)>>,
  pub fail:    bool,
}

impl RecordingCalendar {
  pub fn failing() -> Self { Self { fail: true, ..Default::default() } }
}

impl CalendarMirror for RecordingCalendar {
  type Error = CalendarDown;

  async fn create_event(&self, event: CalendarEvent) -> Result<Option<String>, CalendarDown> {
    if self.fail {
      return Err(CalendarDown);
    }
    let mut created = self.created.lock().unwrap();
    created.push(event);
    Ok(Some(format!("evt-{}", created.len())))
  }

  async fn update_description(&self, event_id: String, description: String) -> Result<(), CalendarDown> {
    if self.fail {
      return Err(CalendarDown);
    }
    self.updated.lock().unwrap().push((event_id, description));
    Ok(())
  }
}
