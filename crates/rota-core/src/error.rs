//! Error types for `rota-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("collaborator not found: {0}")]
  CollaboratorNotFound(i64),

  #[error("assignment not found: {0}")]
  AssignmentNotFound(i64),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
