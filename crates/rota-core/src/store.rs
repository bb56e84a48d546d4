//! The `RotaStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rota-store-sqlite`).
//! Higher layers (`rota-server`, the periodic check) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  assignment::{Assignment, NewAssignment},
  collaborator::{Collaborator, NewCollaborator, Role},
};

/// Abstraction over the roster and assignment storage.
///
/// Uniqueness on collaborator email and on assignment date is enforced by
/// the backend. Inserts that would violate either constraint return
/// `Ok(None)` rather than an error so callers can treat them as a conflict
/// (or, for the periodic check, as "already scheduled").
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RotaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Collaborators ─────────────────────────────────────────────────────

  /// Persist a new collaborator. `created_at` is set by the store.
  ///
  /// Returns `None` if the email is already registered.
  fn add_collaborator(
    &self,
    input: NewCollaborator,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + '_;

  fn get_collaborator(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + '_;

  fn find_collaborator_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + '_;

  /// The roster: every collaborator in creation order.
  fn list_collaborators(
    &self,
  ) -> impl Future<Output = Result<Vec<Collaborator>, Self::Error>> + Send + '_;

  /// Remove a collaborator. Returns `false` if no such collaborator exists.
  ///
  /// Assignments referencing the collaborator are left untouched.
  fn delete_collaborator(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Change a collaborator's role.
  ///
  /// Returns the updated collaborator, or `None` if `id` does not exist.
  fn set_collaborator_role(
    &self,
    id: i64,
    role: Role,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  /// Persist a new assignment. `created_at` is set by the store.
  ///
  /// Returns `None` if the date already has an assignment.
  fn add_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  fn get_assignment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  fn find_assignment_by_date(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Every persisted assignment, ordered by date ascending.
  fn list_assignments(
    &self,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// The assignment with the latest date, past or future.
  fn last_assignment(
    &self,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Point an existing assignment at a different collaborator.
  ///
  /// Returns the updated assignment, or `None` if `id` does not exist.
  fn set_assignment_collaborator(
    &self,
    id: i64,
    collaborator_id: i64,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;
}
