//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use rota_core::{
  assignment::NewAssignment,
  collaborator::{NewCollaborator, Role},
  rotation::reconcile,
  store::RotaStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn collaborator(name: &str) -> NewCollaborator {
  NewCollaborator {
    name:          name.into(),
    email:         format!("{}@example.com", name.to_lowercase()),
    password_hash: "$argon2id$v=19$placeholder".into(),
    role:          Role::Member,
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn new_assignment(date: NaiveDate, collaborator_id: i64) -> NewAssignment {
  NewAssignment { date, collaborator_id, event_id: None }
}

// ─── Collaborators ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_collaborator() {
  let s = store().await;

  let added = s.add_collaborator(collaborator("Ana")).await.unwrap().unwrap();
  assert_eq!(added.name, "Ana");
  assert_eq!(added.role, Role::Member);

  let fetched = s.get_collaborator(added.collaborator_id).await.unwrap().unwrap();
  assert_eq!(fetched.email, "ana@example.com");
  assert_eq!(fetched.password_hash, added.password_hash);
  assert_eq!(fetched.created_at, added.created_at);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.add_collaborator(collaborator("Ana")).await.unwrap().unwrap();

  let again = s.add_collaborator(collaborator("Ana")).await.unwrap();
  assert!(again.is_none());
  assert_eq!(s.list_collaborators().await.unwrap().len(), 1);
}

#[tokio::test]
async fn find_by_email() {
  let s = store().await;
  let ana = s.add_collaborator(collaborator("Ana")).await.unwrap().unwrap();

  let found = s.find_collaborator_by_email("ana@example.com".into()).await.unwrap();
  assert_eq!(found.map(|c| c.collaborator_id), Some(ana.collaborator_id));

  let missing = s.find_collaborator_by_email("nobody@example.com".into()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn roster_is_in_creation_order() {
  let s = store().await;
  for name in ["Carla", "Ana", "Bruno"] {
    s.add_collaborator(collaborator(name)).await.unwrap().unwrap();
  }

  let names: Vec<String> = s
    .list_collaborators()
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  assert_eq!(names, vec!["Carla", "Ana", "Bruno"]);
}

#[tokio::test]
async fn delete_collaborator_keeps_history() {
  let s = store().await;
  let ana = s.add_collaborator(collaborator("Ana")).await.unwrap().unwrap();
  s.add_assignment(new_assignment(date(2025, 2, 28), ana.collaborator_id))
    .await
    .unwrap()
    .unwrap();

  assert!(s.delete_collaborator(ana.collaborator_id).await.unwrap());
  assert!(!s.delete_collaborator(ana.collaborator_id).await.unwrap());
  assert!(s.get_collaborator(ana.collaborator_id).await.unwrap().is_none());

  let history = s.list_assignments().await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].collaborator_id, ana.collaborator_id);
}

#[tokio::test]
async fn set_collaborator_role_promotes() {
  let s = store().await;
  let ana = s.add_collaborator(collaborator("Ana")).await.unwrap().unwrap();

  let promoted = s.set_collaborator_role(ana.collaborator_id, Role::Admin).await.unwrap().unwrap();
  assert_eq!(promoted.role, Role::Admin);

  let fetched = s.get_collaborator(ana.collaborator_id).await.unwrap().unwrap();
  assert_eq!(fetched.role, Role::Admin);

  assert!(s.set_collaborator_role(9_999, Role::Admin).await.unwrap().is_none());
}

// ─── Assignments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_assignment_by_date() {
  let s = store().await;
  let added = s
    .add_assignment(NewAssignment {
      date:            date(2025, 3, 7),
      collaborator_id: 1,
      event_id:        Some("evt-1".into()),
    })
    .await
    .unwrap()
    .unwrap();

  let found = s.find_assignment_by_date(date(2025, 3, 7)).await.unwrap().unwrap();
  assert_eq!(found, added);
  assert!(s.find_assignment_by_date(date(2025, 3, 14)).await.unwrap().is_none());
}

#[tokio::test]
async fn one_assignment_per_date() {
  let s = store().await;
  s.add_assignment(new_assignment(date(2025, 3, 7), 1)).await.unwrap().unwrap();

  let second = s.add_assignment(new_assignment(date(2025, 3, 7), 2)).await.unwrap();
  assert!(second.is_none());

  let all = s.list_assignments().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].collaborator_id, 1);
}

#[tokio::test]
async fn assignments_are_date_ordered() {
  let s = store().await;
  for d in [date(2025, 3, 14), date(2025, 2, 28), date(2025, 3, 7)] {
    s.add_assignment(new_assignment(d, 1)).await.unwrap().unwrap();
  }

  let dates: Vec<NaiveDate> = s.list_assignments().await.unwrap().iter().map(|a| a.date).collect();
  assert_eq!(dates, vec![date(2025, 2, 28), date(2025, 3, 7), date(2025, 3, 14)]);

  let last = s.last_assignment().await.unwrap().unwrap();
  assert_eq!(last.date, date(2025, 3, 14));
}

#[tokio::test]
async fn last_assignment_of_empty_store_is_none() {
  let s = store().await;
  assert!(s.last_assignment().await.unwrap().is_none());
}

#[tokio::test]
async fn set_assignment_collaborator_updates_in_place() {
  let s = store().await;
  let a = s.add_assignment(new_assignment(date(2025, 3, 7), 1)).await.unwrap().unwrap();

  let updated = s.set_assignment_collaborator(a.assignment_id, 2).await.unwrap().unwrap();
  assert_eq!(updated.assignment_id, a.assignment_id);
  assert_eq!(updated.collaborator_id, 2);
  assert_eq!(updated.date, a.date);

  assert!(s.set_assignment_collaborator(9_999, 2).await.unwrap().is_none());
}

// ─── Round trip through the reconciler ───────────────────────────────────────

#[tokio::test]
async fn persisted_assignment_round_trips_through_reconciler() {
  let s = store().await;
  let mut ids = Vec::new();
  for name in ["A", "B", "C"] {
    ids.push(s.add_collaborator(collaborator(name)).await.unwrap().unwrap().collaborator_id);
  }
  let past   = s.add_assignment(new_assignment(date(2025, 2, 28), ids[1])).await.unwrap().unwrap();
  let future = s.add_assignment(new_assignment(date(2025, 3, 14), ids[0])).await.unwrap().unwrap();

  let roster  = s.list_collaborators().await.unwrap();
  let history = s.list_assignments().await.unwrap();
  let view    = reconcile(&roster, &history, date(2025, 3, 3), 10);

  assert_eq!(view.past, vec![past]);
  assert_eq!(view.future[1], rota_core::assignment::Slot::Persisted(future));
}
