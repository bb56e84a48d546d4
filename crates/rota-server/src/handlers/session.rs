//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: `{"name","email","password"}`; 201 + collaborator; admin if listed in `admin_emails` |
//! | `POST` | `/auth/login` | Body: `{"email","password"}`; 401 on any mismatch |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rota_core::{
  calendar::CalendarMirror,
  collaborator::{Collaborator, NewCollaborator, Role},
  store::RotaStore,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  AppState,
  auth::{hash_password, normalize_email, verify_credentials},
  error::ApiError,
};

/// Take a required, non-blank field.
fn required(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /auth/register`
pub async fn register<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let (Some(name), Some(email), Some(password)) = (
    required(body.name),
    required(body.email),
    body.password.filter(|p| !p.is_empty()),
  ) else {
    return Err(ApiError::BadRequest(
      "name, email and password are required".to_string(),
    ));
  };

  let email = normalize_email(&email);
  let role  = if state.config.is_admin_email(&email) { Role::Admin } else { Role::Member };
  let password_hash = hash_password(&password)?;

  let collaborator = state
    .store
    .add_collaborator(NewCollaborator { name, email, password_hash, role })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Conflict("email already in use".to_string()))?;

  info!(
    collaborator_id = collaborator.collaborator_id,
    role = ?collaborator.role,
    "collaborator registered"
  );
  Ok((StatusCode::CREATED, Json(collaborator)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub message: &'static str,
  pub user:    Collaborator,
}

/// `POST /auth/login`
pub async fn login<S, C>(
  State(state): State<AppState<S, C>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let (Some(email), Some(password)) = (required(body.email), body.password) else {
    return Err(ApiError::BadRequest("email and password are required".to_string()));
  };

  let user = verify_credentials(state.store.as_ref(), &email, &password).await?;
  info!(collaborator_id = user.collaborator_id, "login succeeded");
  Ok(Json(LoginResponse { message: "login successful", user }))
}
