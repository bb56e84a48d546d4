//! Handlers for `/schedule` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/schedule` | Past assignments plus the projected horizon |
//! | `PUT`  | `/schedule/:id` | Admin only; body `{"new_collaborator_id"}` |
//! | `POST` | `/schedule/run-now` | Admin only; runs the periodic check once |

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use rota_core::{
  assignment::{Assignment, Slot},
  calendar::CalendarMirror,
  collaborator::Collaborator,
  job::CheckOutcome,
  reassign::reassign,
  rotation::reconcile,
  store::RotaStore,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, auth::Admin, error::ApiError, scheduler::run_check};

// ─── Response shape ───────────────────────────────────────────────────────────

/// One schedule row as the client sees it, with the assignee's name
/// resolved. The name is `None` once the collaborator has been deleted.
#[derive(Debug, Serialize)]
pub struct EntryBody {
  pub id:                i64,
  pub date:              NaiveDate,
  pub collaborator_id:   i64,
  pub collaborator_name: Option<String>,
  pub event_id:          Option<String>,
  pub is_generated:      bool,
}

#[derive(Debug, Serialize)]
pub struct ScheduleBody {
  pub past:   Vec<EntryBody>,
  pub future: Vec<EntryBody>,
}

struct Names(HashMap<i64, String>);

impl Names {
  fn new(roster: &[Collaborator]) -> Self {
    Self(roster.iter().map(|c| (c.collaborator_id, c.name.clone())).collect())
  }

  fn get(&self, id: i64) -> Option<String> { self.0.get(&id).cloned() }

  fn assignment(&self, a: Assignment) -> EntryBody {
    EntryBody {
      id:                a.assignment_id,
      date:              a.date,
      collaborator_name: self.get(a.collaborator_id),
      collaborator_id:   a.collaborator_id,
      event_id:          a.event_id,
      is_generated:      false,
    }
  }

  fn slot(&self, slot: Slot) -> EntryBody {
    match slot {
      Slot::Persisted(a) => self.assignment(a),
      Slot::Generated(p) => EntryBody {
        id:                p.id,
        date:              p.date,
        collaborator_name: self.get(p.collaborator_id),
        collaborator_id:   p.collaborator_id,
        event_id:          None,
        is_generated:      true,
      },
    }
  }
}

// ─── View ─────────────────────────────────────────────────────────────────────

/// `GET /schedule`
pub async fn view<S, C>(
  State(state): State<AppState<S, C>>,
) -> Result<Json<ScheduleBody>, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let roster      = state.store.list_collaborators().await.map_err(ApiError::store)?;
  let assignments = state.store.list_assignments().await.map_err(ApiError::store)?;

  let view  = reconcile(&roster, &assignments, state.config.today(), state.config.horizon_weeks);
  let names = Names::new(&roster);

  Ok(Json(ScheduleBody {
    past:   view.past.into_iter().map(|a| names.assignment(a)).collect(),
    future: view.future.into_iter().map(|s| names.slot(s)).collect(),
  }))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EditBody {
  pub new_collaborator_id: Option<i64>,
}

/// `PUT /schedule/:id`
///
/// Only persisted assignments can be edited; a placeholder id is a 404.
pub async fn edit<S, C>(
  State(state): State<AppState<S, C>>,
  Admin(actor): Admin,
  Path(id): Path<i64>,
  Json(body): Json<EditBody>,
) -> Result<Json<EntryBody>, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  let collaborator_id = body
    .new_collaborator_id
    .ok_or_else(|| ApiError::BadRequest("new_collaborator_id is required".to_string()))?;

  let updated = reassign(
    state.store.as_ref(),
    state.calendar.as_ref(),
    &state.config.event,
    id,
    collaborator_id,
  )
  .await?;
  info!(assignment_id = id, actor_id = actor.collaborator_id, "schedule edited");

  let name = state
    .store
    .get_collaborator(collaborator_id)
    .await
    .map_err(ApiError::store)?
    .map(|c| c.name);

  Ok(Json(EntryBody {
    id:                updated.assignment_id,
    date:              updated.date,
    collaborator_id:   updated.collaborator_id,
    collaborator_name: name,
    event_id:          updated.event_id,
    is_generated:      false,
  }))
}

// ─── Run now ──────────────────────────────────────────────────────────────────

/// `POST /schedule/run-now`
pub async fn run_now<S, C>(
  State(state): State<AppState<S, C>>,
  Admin(actor): Admin,
) -> Result<Json<CheckOutcome>, ApiError>
where
  S: RotaStore + 'static,
  C: CalendarMirror + 'static,
{
  info!(actor_id = actor.collaborator_id, "manual schedule check requested");
  let outcome = run_check(&state).await?;
  Ok(Json(outcome))
}
