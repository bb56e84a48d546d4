//! Handlers for `/collaborators` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/collaborators` | The roster, in rotation order |
//! | `DELETE` | `/collaborators/:id` | Admin only; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use rota_core::{calendar::CalendarMirror, collaborator::Collaborator, store::RotaStore};
use tracing::info;

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /collaborators`
pub async fn list<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<Vec<Collaborator>>, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let roster = state
    .store
    .list_collaborators()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(roster))
}

/// `DELETE /collaborators/:id`
///
/// Past assignments of the removed collaborator are kept as they are.
pub async fn remove<S, C>(
  State(state): State<AppState<S, C>>,
  Admin(actor): Admin,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let deleted = state
    .store
    .delete_collaborator(id)
    .await
    .map_err(ApiError::store)?;

  if !deleted {
    return Err(ApiError::NotFound(format!("collaborator {id} not found")));
  }
  info!(collaborator_id = id, actor_id = actor.collaborator_id, "collaborator removed");
  Ok(StatusCode::NO_CONTENT)
}
