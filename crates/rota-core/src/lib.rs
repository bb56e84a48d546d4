//! Core types and trait definitions for the Friday rotation service.
//!
//! No HTTP or database dependencies live here.
//! Storage backends implement [`store::RotaStore`]; calendar integrations
//! implement [`calendar::CalendarMirror`]. The rotation logic itself lives in
//! [`rotation`] and is a pure function over a snapshot of both.

// Native `async fn` in trait impls; the traits spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod assignment;
pub mod calendar;
pub mod collaborator;
pub mod error;
pub mod job;
pub mod reassign;
pub mod rotation;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
