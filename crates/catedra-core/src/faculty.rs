//! Faculty and department records.
//!
//! A faculty owns its subjects, professors, and departments through their
//! owning-faculty references; membership is derived by query, never stored
//! as an id array on the faculty itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
  pub faculty_id:   Uuid,
  pub name:         String,
  pub abbreviation: String,
  pub created_at:   DateTime<Utc>,
}

/// Optional grouping for subjects within a faculty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
  pub department_id: Uuid,
  pub faculty_id:    Uuid,
  pub name:          String,
}
