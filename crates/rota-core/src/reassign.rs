//! Manual override of a single persisted assignment.
//!
//! The override touches exactly one row. It never changes roster order and
//! never ripples into later assignments; the rotation simply continues from
//! whoever ends up on the latest date.

use tracing::{info, warn};

use crate::{
  Error, Result,
  assignment::Assignment,
  calendar::{CalendarMirror, EventTemplate},
  store::RotaStore,
};

/// Reassign `assignment_id` to `collaborator_id`.
///
/// Both records must exist, otherwise nothing is written. The local change
/// is persisted first; the mirrored event's description is updated
/// afterwards and a calendar failure is only logged.
pub async fn reassign<S, C>(
  store:           &S,
  calendar:        &C,
  template:        &EventTemplate,
  assignment_id:   i64,
  collaborator_id: i64,
) -> Result<Assignment>
where
  S: RotaStore,
  C: CalendarMirror,
{
  store
    .get_assignment(assignment_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AssignmentNotFound(assignment_id))?;

  let collaborator = store
    .get_collaborator(collaborator_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::CollaboratorNotFound(collaborator_id))?;

  let updated = store
    .set_assignment_collaborator(assignment_id, collaborator_id)
    .await
    .map_err(Error::store)?
    .ok_or(Error::AssignmentNotFound(assignment_id))?;

  info!(assignment_id, collaborator_id, date = %updated.date, "assignment reassigned");

  if let Some(event_id) = updated.event_id.clone() {
    let description = template.description(&collaborator.name, updated.date);
    if let Err(e) = calendar.update_description(event_id.clone(), description).await {
      warn!(assignment_id, %event_id, error = %e, "calendar description update failed");
    }
  }

  Ok(updated)
}
