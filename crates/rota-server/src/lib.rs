//! HTTP layer for the Friday cleaning rotation.
//!
//! Exposes an axum [`Router`] serving the JSON API under `/api`, backed by
//! any [`RotaStore`] and [`CalendarMirror`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod scheduler;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc, Weekday};
use rota_calendar::GoogleCalendarConfig;
use rota_core::{
  calendar::{CalendarMirror, EventTemplate},
  rotation::DEFAULT_HORIZON,
  store::RotaStore,
};
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use handlers::{collaborators, schedule, session};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3001 }
fn default_store_path() -> PathBuf { PathBuf::from("rota.db") }
fn default_horizon() -> usize { DEFAULT_HORIZON }
fn default_job_weekday() -> Weekday { Weekday::Mon }
fn default_job_hour() -> u32 { 9 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROTA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default = "default_store_path")]
  pub store_path:    PathBuf,
  /// Number of upcoming Fridays shown by `GET /api/schedule`.
  #[serde(default = "default_horizon")]
  pub horizon_weeks: usize,
  #[serde(default = "default_job_weekday")]
  pub job_weekday:   Weekday,
  #[serde(default = "default_job_hour")]
  pub job_hour:      u32,
  #[serde(default)]
  pub job_minute:    u32,
  #[serde(default)]
  pub event:         EventTemplate,
  /// Absent means the calendar mirror is disabled.
  #[serde(default)]
  pub calendar:      Option<GoogleCalendarConfig>,
  /// Registering with one of these emails grants
  /// [`Role::Admin`](rota_core::collaborator::Role::Admin).
  #[serde(default)]
  pub admin_emails:  Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          default_host(),
      port:          default_port(),
      store_path:    default_store_path(),
      horizon_weeks: default_horizon(),
      job_weekday:   default_job_weekday(),
      job_hour:      default_job_hour(),
      job_minute:    0,
      event:         EventTemplate::default(),
      calendar:      None,
      admin_emails:  Vec::new(),
    }
  }
}

impl ServerConfig {
  /// Case-insensitive membership in `admin_emails`.
  pub fn is_admin_email(&self, email: &str) -> bool {
    let email = auth::normalize_email(email);
    self.admin_emails.iter().any(|e| auth::normalize_email(e) == email)
  }

  /// The current calendar date at the office's UTC offset.
  pub fn today(&self) -> NaiveDate {
    Utc::now().with_timezone(&self.event.offset()).date_naive()
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub store:    Arc<S>,
  pub calendar: Arc<C>,
  pub config:   Arc<ServerConfig>,
  /// Held for the duration of every schedule check.
  pub job_lock: Arc<Mutex<()>>,
}

// Derived `Clone` would demand `S: Clone` and `C: Clone`.
impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      calendar: self.calendar.clone(),
      config:   self.config.clone(),
      job_lock: self.job_lock.clone(),
    }
  }
}

impl<S, C> AppState<S, C> {
  pub fn new(store: S, calendar: C, config: ServerConfig) -> Self {
    Self {
      store:    Arc::new(store),
      calendar: Arc::new(calendar),
      config:   Arc::new(config),
      job_lock: Arc::new(Mutex::new(())),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the rotation API.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let api = Router::new()
    .route("/auth/register",      post(session::register::<S, C>))
    .route("/auth/login",         post(session::login::<S, C>))
    .route("/collaborators",      get(collaborators::list::<S, C>))
    .route("/collaborators/{id}", delete(collaborators::remove::<S, C>))
    .route("/schedule",           get(schedule::view::<S, C>))
    .route("/schedule/run-now",   post(schedule::run_now::<S, C>))
    .route("/schedule/{id}",      put(schedule::edit::<S, C>));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
