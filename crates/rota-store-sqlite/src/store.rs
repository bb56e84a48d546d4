//! [`SqliteStore`], the SQLite implementation of [`RotaStore`].

use std::path::Path;

use chrono::{NaiveDate, SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, types::Value};

use rota_core::{
  assignment::{Assignment, NewAssignment},
  collaborator::{Collaborator, NewCollaborator, Role},
  store::RotaStore,
};

use crate::{
  Result,
  encode::{
    ASSIGNMENT_COLUMNS, COLLABORATOR_COLUMNS, RawAssignment, RawCollaborator,
    encode_date, encode_dt, encode_role,
  },
  schema::SCHEMA,
};

/// `true` if `e` is a UNIQUE constraint violation.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rotation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one collaborator matching `column = value`.
  async fn collaborator_where(
    &self,
    column: &'static str,
    value:  Value,
  ) -> Result<Option<Collaborator>> {
    let raw: Option<RawCollaborator> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {COLLABORATOR_COLUMNS} FROM collaborators WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawCollaborator::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCollaborator::into_collaborator).transpose()
  }

  /// Fetch at most one assignment matching `column = value`.
  async fn assignment_where(
    &self,
    column: &'static str,
    value:  Value,
  ) -> Result<Option<Assignment>> {
    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawAssignment::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }
}

// ─── RotaStore impl ──────────────────────────────────────────────────────────

impl RotaStore for SqliteStore {
  type Error = crate::Error;

  // ── Collaborators ─────────────────────────────────────────────────────────

  async fn add_collaborator(&self, input: NewCollaborator) -> Result<Option<Collaborator>> {
    let created_at = Utc::now().trunc_subsecs(6);

    let name     = input.name.clone();
    let email    = input.email.clone();
    let hash     = input.password_hash.clone();
    let role_str = encode_role(input.role).to_owned();
    let at_str   = encode_dt(created_at);

    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO collaborators (name, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![name, email, hash, role_str, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.map(|collaborator_id| Collaborator {
      collaborator_id,
      name: input.name,
      email: input.email,
      password_hash: input.password_hash,
      role: input.role,
      created_at,
    }))
  }

  async fn get_collaborator(&self, id: i64) -> Result<Option<Collaborator>> {
    self.collaborator_where("collaborator_id", Value::Integer(id)).await
  }

  async fn find_collaborator_by_email(&self, email: String) -> Result<Option<Collaborator>> {
    self.collaborator_where("email", Value::Text(email)).await
  }

  async fn list_collaborators(&self) -> Result<Vec<Collaborator>> {
    let raws: Vec<RawCollaborator> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLLABORATOR_COLUMNS} FROM collaborators
           ORDER BY created_at ASC, collaborator_id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawCollaborator::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCollaborator::into_collaborator).collect()
  }

  async fn delete_collaborator(&self, id: i64) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM collaborators WHERE collaborator_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(n > 0)
  }

  async fn set_collaborator_role(&self, id: i64, role: Role) -> Result<Option<Collaborator>> {
    let role_str = encode_role(role).to_owned();
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE collaborators SET role = ?1 WHERE collaborator_id = ?2",
          rusqlite::params![role_str, id],
        )?)
      })
      .await?;

    if n == 0 {
      return Ok(None);
    }
    self.get_collaborator(id).await
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn add_assignment(&self, input: NewAssignment) -> Result<Option<Assignment>> {
    let created_at = Utc::now().trunc_subsecs(6);

    let date_str        = encode_date(input.date);
    let collaborator_id = input.collaborator_id;
    let event_id        = input.event_id.clone();
    let at_str          = encode_dt(created_at);

    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO assignments (date, collaborator_id, event_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![date_str, collaborator_id, event_id, at_str],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.map(|assignment_id| Assignment {
      assignment_id,
      date: input.date,
      collaborator_id: input.collaborator_id,
      event_id: input.event_id,
      created_at,
    }))
  }

  async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
    self.assignment_where("assignment_id", Value::Integer(id)).await
  }

  async fn find_assignment_by_date(&self, date: NaiveDate) -> Result<Option<Assignment>> {
    self.assignment_where("date", Value::Text(encode_date(date))).await
  }

  async fn list_assignments(&self) -> Result<Vec<Assignment>> {
    let raws: Vec<RawAssignment> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY date ASC"
        ))?;
        let rows = stmt
          .query_map([], RawAssignment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn last_assignment(&self) -> Result<Option<Assignment>> {
    let raw: Option<RawAssignment> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY date DESC LIMIT 1"),
              [],
              RawAssignment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn set_assignment_collaborator(
    &self,
    id:              i64,
    collaborator_id: i64,
  ) -> Result<Option<Assignment>> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE assignments SET collaborator_id = ?1 WHERE assignment_id = ?2",
          rusqlite::params![collaborator_id, id],
        )?)
      })
      .await?;

    if n == 0 {
      return Ok(None);
    }
    self.get_assignment(id).await
  }
}
