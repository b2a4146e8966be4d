//! Rating — a single anonymous review of a professor on a subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The five numeric scores of a rating, each in 1–5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
  pub general:       f64,
  pub explanation:   f64,
  pub accessibility: f64,
  pub difficulty:    f64,
  pub attendance:    f64,
}

impl Scores {
  /// Reject any score outside the 1–5 range.
  pub fn validate(&self) -> Result<()> {
    for v in [
      self.general,
      self.explanation,
      self.accessibility,
      self.difficulty,
      self.attendance,
    ] {
      if !(1.0..=5.0).contains(&v) {
        return Err(Error::InvalidScore(v));
      }
    }
    Ok(())
  }
}

/// A rating is immutable once created, except for its vote sets.
///
/// `dislikes` is a legacy field kept for schema compatibility; the product
/// only exposes likes. Toggling a like removes the voter from `dislikes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
  pub rating_id:    Uuid,
  pub professor_id: Uuid,
  pub subject_id:   Uuid,
  #[serde(flatten)]
  pub scores:       Scores,
  pub would_retake: bool,
  pub comment:      String,
  /// Anonymous client-generated voter identifiers.
  pub likes:        Vec<String>,
  pub dislikes:     Vec<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::add_rating`].
/// `created_at` is always set by the store.
#[derive(Debug, Clone)]
pub struct NewRating {
  pub professor_id: Uuid,
  pub subject_id:   Uuid,
  pub scores:       Scores,
  pub would_retake: bool,
  pub comment:      String,
}
