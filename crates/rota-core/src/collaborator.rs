//! Collaborators: the members of the roster.
//!
//! The roster is the list of collaborators ordered by `created_at`; that order
//! is the rotation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level of a collaborator.
///
/// Only admins may remove collaborators, edit assignments or force the
/// periodic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  Admin,
  #[default]
  Member,
}

/// A registered collaborator.
///
/// `password_hash` is an argon2 PHC string and is never serialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
  pub collaborator_id: i64,
  pub name:            String,
  pub email:           String,
  #[serde(skip)]
  pub password_hash:   String,
  pub role:            Role,
  pub created_at:      DateTime<Utc>,
}

/// Input for [`RotaStore::add_collaborator`](crate::store::RotaStore::add_collaborator).
#[derive(Debug, Clone)]
pub struct NewCollaborator {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}
