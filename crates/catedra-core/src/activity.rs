//! Append-only activity log for the admin dashboard feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which catalog mutation an activity entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
  CreateFaculty,
  UpdateFaculty,
  DeleteFaculty,
  CreateSubject,
  UpdateSubject,
  DeleteSubject,
  CreateProfessor,
  UpdateProfessor,
  DeleteProfessor,
}

impl ActivityAction {
  /// Human-readable feed line, given the resolved entity name.
  pub fn describe(&self, entity_name: &str) -> String {
    match self {
      Self::CreateFaculty => format!("Faculty added: {entity_name}"),
      Self::UpdateFaculty => format!("Faculty updated: {entity_name}"),
      Self::DeleteFaculty => format!("Faculty deleted: {entity_name}"),
      Self::CreateSubject => format!("Subject added: {entity_name}"),
      Self::UpdateSubject => format!("Subject updated: {entity_name}"),
      Self::DeleteSubject => format!("Subject deleted: {entity_name}"),
      Self::CreateProfessor => format!("New professor added: {entity_name}"),
      Self::UpdateProfessor => format!("Professor updated: {entity_name}"),
      Self::DeleteProfessor => format!("Professor deleted: {entity_name}"),
    }
  }
}

/// The kind half of a tagged entity reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Faculty,
  Subject,
  Professor,
}

/// A tagged `{kind, id}` reference, resolved for display by an explicit
/// kind-to-table lookup in the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntityRef {
  pub kind: EntityKind,
  pub id:   Uuid,
}

/// One row of the append-only activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
  pub activity_id: Uuid,
  pub action:      ActivityAction,
  pub entity:      EntityRef,
  /// Optional free-text change summary.
  pub changes:     Option<String>,
  pub timestamp:   DateTime<Utc>,
}

/// An activity entry with the related entity's current name resolved.
/// `entity_name` is `None` when the entity has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedActivity {
  pub entry:       ActivityEntry,
  pub entity_name: Option<String>,
}

/// Entity counts for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DashboardCounts {
  pub faculties:  u64,
  pub subjects:   u64,
  pub professors: u64,
  pub ratings:    u64,
}
