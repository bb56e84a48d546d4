//! rota-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `ROTA_*`
//! environment variables, opens the SQLite store, arms the weekly schedule
//! check and serves the JSON API over HTTP.
//!
//! # One-off check
//!
//! To run the periodic check a single time (e.g. from cron) and exit:
//!
//! ```
//! cargo run -p rota-server -- --run-once
//! ```
//!
//! # First admin
//!
//! Either list the email under `admin_emails` before that person registers,
//! or promote an existing collaborator:
//!
//! ```
//! cargo run -p rota-server -- --promote ana@example.com
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use rota_calendar::CalendarBackend;
use rota_core::{collaborator::Role, store::RotaStore as _};
use rota_server::{AppState, ServerConfig, auth::normalize_email, scheduler};
use rota_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Friday cleaning rotation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run the schedule check once, print the outcome and exit.
  #[arg(long)]
  run_once: bool,

  /// Grant the admin role to the collaborator with this email and exit.
  #[arg(long, value_name = "EMAIL")]
  promote: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  let cli = Cli::parse();

  let cfg        = load_config(cli.config)?;
  let store_path = expand_tilde(&cfg.store_path);
  let store      = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  if let Some(email) = cli.promote {
    return promote(&store, &email).await;
  }

  let calendar = CalendarBackend::from_config(cfg.calendar.clone())
    .context("failed to build calendar client")?;
  if !calendar.is_enabled() {
    warn!("no [calendar] section; assignments will not be mirrored");
  }

  let address = format!("{}:{}", cfg.host, cfg.port);
  let state   = AppState::new(store, calendar, cfg);

  if cli.run_once {
    let outcome = scheduler::run_check(&state)
      .await
      .context("schedule check failed")?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    return Ok(());
  }

  scheduler::spawn_weekly(state.clone());

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!("listening on http://{address}");

  axum::serve(listener, rota_server::router(state))
    .await
    .context("server error")
}

/// Set `email`'s role to admin.
async fn promote(store: &SqliteStore, email: &str) -> anyhow::Result<()> {
  let collaborator = store
    .find_collaborator_by_email(normalize_email(email))
    .await
    .context("failed to look up collaborator")?
    .with_context(|| format!("no collaborator registered as {email}"))?;

  store
    .set_collaborator_role(collaborator.collaborator_id, Role::Admin)
    .await
    .context("failed to update role")?;
  info!(collaborator_id = collaborator.collaborator_id, "collaborator promoted to admin");
  Ok(())
}

/// `RUST_LOG` wins; otherwise INFO.
fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();
}

/// Layer `ROTA_*` variables over the (optional) TOML file.
/// Nested keys use `__`, e.g. `ROTA_CALENDAR__ACCESS_TOKEN`;
/// `ROTA_ADMIN_EMAILS` is comma-separated.
fn load_config(path: PathBuf) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("ROTA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("admin_emails"),
    )
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("invalid configuration")
}

/// Resolve a leading `~/` against `$HOME`.
fn expand_tilde(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
