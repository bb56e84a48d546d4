//! Password hashing and the HTTP Basic-auth extractors.
//!
//! Credentials are checked on every request against the collaborator table;
//! no session or token is issued. [`Authenticated`] admits any collaborator,
//! [`Admin`] only those with [`Role::Admin`].

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;
use rota_core::{
  calendar::CalendarMirror,
  collaborator::{Collaborator, Role},
  store::RotaStore,
};

use crate::{AppState, error::ApiError};

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Constant-time check of `password` against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else { return false };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Stand-in hash verified when the email is unknown, so that a miss costs
/// the same argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<String> =
  LazyLock::new(|| hash_password("rota-dummy-password").unwrap_or_default());

/// Verify against `stored`, or burn an equivalent verify when it is absent.
fn check_password(password: &str, stored: Option<&str>) -> bool {
  match stored {
    Some(phc) => verify_password(password, phc),
    None => {
      let _ = verify_password(password, &DUMMY_HASH);
      false
    }
  }
}

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Look up `email` and check `password`.
///
/// An unknown email and a wrong password are indistinguishable to the
/// caller, in body and in timing.
pub async fn verify_credentials<S>(
  store:    &S,
  email:    &str,
  password: &str,
) -> Result<Collaborator, ApiError>
where
  S: RotaStore,
{
  let found = store
    .find_collaborator_by_email(normalize_email(email))
    .await
    .map_err(ApiError::store)?;

  let stored = found.as_ref().map(|c| c.password_hash.as_str());
  if !check_password(password, stored) {
    return Err(ApiError::Unauthorized);
  }
  found.ok_or(ApiError::Unauthorized)
}

/// Decode `Authorization: Basic …` into `(email, password)`.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  Ok((normalize_email(email), password.to_string()))
}

/// Present in a handler's arguments means the request carried valid
/// collaborator credentials.
pub struct Authenticated(pub Collaborator);

impl<S, C> FromRequestParts<AppState<S, C>> for Authenticated
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let (email, password) = basic_credentials(&parts.headers)?;
    let collaborator = verify_credentials(state.store.as_ref(), &email, &password).await?;
    Ok(Authenticated(collaborator))
  }
}

/// Like [`Authenticated`], but the collaborator must also be an admin.
/// Valid credentials without the role are a 403.
pub struct Admin(pub Collaborator);

impl<S, C> FromRequestParts<AppState<S, C>> for Admin
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, C>,
  ) -> Result<Self, Self::Rejection> {
    let Authenticated(collaborator) = Authenticated::from_request_parts(parts, state).await?;
    if collaborator.role != Role::Admin {
      return Err(ApiError::Forbidden("admin role required".to_string()));
    }
    Ok(Admin(collaborator))
  }
}
