//! Subject — a course students rate professors on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A subject within a faculty.
///
/// `normalized_name` is the fold of `name` and is unique within a faculty;
/// it exists only for duplicate detection and search.
///
/// `professor_ids` is one half of the professor↔subject link. Invariant:
/// a professor id appears here if and only if this subject's id appears in
/// that professor's `subject_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub subject_id:      Uuid,
  pub faculty_id:      Uuid,
  pub department_id:   Option<Uuid>,
  pub name:            String,
  pub normalized_name: String,
  pub credits:         u32,
  pub description:     Option<String>,
  pub professor_ids:   Vec<Uuid>,
}

/// Input to [`crate::store::CatalogStore::add_subject`].
/// `normalized_name` is always computed by the store from `name`.
#[derive(Debug, Clone)]
pub struct NewSubject {
  pub faculty_id:    Uuid,
  pub department_id: Option<Uuid>,
  pub name:          String,
  pub credits:       u32,
  pub description:   Option<String>,
}

/// Field updates for an existing subject. `None` leaves a field unchanged;
/// `department_id` is replaced wholesale (set to `Some(None)` to clear).
#[derive(Debug, Clone, Default)]
pub struct SubjectUpdate {
  pub name:          Option<String>,
  pub credits:       Option<u32>,
  pub description:   Option<Option<String>>,
  pub department_id: Option<Option<Uuid>>,
}
