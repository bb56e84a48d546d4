//! Error type for `rota-calendar`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("calendar API returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("invalid calendar URL: {0}")]
  Url(String),

  #[error("calendar API response carried no event id")]
  MissingEventId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
