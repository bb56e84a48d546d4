//! [`RotaStore`](rota_core::store::RotaStore) on a single SQLite file.
//!
//! Queries run on [`tokio_rusqlite`]'s background connection thread. The
//! collaborator email and the assignment date are UNIQUE columns; inserts
//! that hit either come back as `Ok(None)`.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
