//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed microsecond
//! precision, so lexical order equals chronological order. Calendar dates are
//! stored as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rota_core::{
  assignment::Assignment,
  collaborator::{Collaborator, Role},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Member => "member",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "member" => Ok(Role::Member),
    other => Err(Error::UnknownRole(other.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const COLLABORATOR_COLUMNS: &str =
  "collaborator_id, name, email, password_hash, role, created_at";

pub const ASSIGNMENT_COLUMNS: &str =
  "assignment_id, date, collaborator_id, event_id, created_at";

/// Raw values read directly from a `collaborators` row.
pub struct RawCollaborator {
  pub collaborator_id: i64,
  pub name:            String,
  pub email:           String,
  pub password_hash:   String,
  pub role:            String,
  pub created_at:      String,
}

impl RawCollaborator {
  /// Map a row selected with [`COLLABORATOR_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      collaborator_id: row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      password_hash:   row.get(3)?,
      role:            row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_collaborator(self) -> Result<Collaborator> {
    Ok(Collaborator {
      collaborator_id: self.collaborator_id,
      name:            self.name,
      email:           self.email,
      password_hash:   self.password_hash,
      role:            decode_role(&self.role)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `assignments` row.
pub struct RawAssignment {
  pub assignment_id:   i64,
  pub date:            String,
  pub collaborator_id: i64,
  pub event_id:        Option<String>,
  pub created_at:      String,
}

impl RawAssignment {
  /// Map a row selected with [`ASSIGNMENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id:   row.get(0)?,
      date:            row.get(1)?,
      collaborator_id: row.get(2)?,
      event_id:        row.get(3)?,
      created_at:      row.get(4)?,
    })
  }

  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      assignment_id:   self.assignment_id,
      date:            decode_date(&self.date)?,
      collaborator_id: self.collaborator_id,
      event_id:        self.event_id,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
