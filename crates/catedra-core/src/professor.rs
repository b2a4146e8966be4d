//! Professor records and their denormalized rating statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The denormalized aggregate snapshot stored on a professor, recomputed
/// wholesale on every rating-set change. The zero-state (no ratings) is all
/// zeroes — never NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
  pub total_ratings:           u64,
  pub average_general:         f64,
  pub average_explanation:     f64,
  pub average_accessibility:   f64,
  pub average_difficulty:      f64,
  pub average_attendance:      f64,
  pub would_retake_count:      u64,
  pub would_retake_percentage: f64,
}

/// A professor within a faculty.
///
/// `name` is stored title-cased. `subject_ids` is one half of the
/// professor↔subject link; see [`crate::subject::Subject::professor_ids`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Professor {
  pub professor_id: Uuid,
  pub faculty_id:   Uuid,
  pub name:         String,
  /// Free-text department label; distinct from the Department entity.
  pub department:   Option<String>,
  pub subject_ids:  Vec<Uuid>,
  pub rating_stats: RatingStats,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::create_professor`].
/// The store folds `name` for duplicate search and title-cases it for
/// storage.
#[derive(Debug, Clone)]
pub struct NewProfessor {
  pub faculty_id:  Uuid,
  pub name:        String,
  pub department:  Option<String>,
  pub subject_ids: Vec<Uuid>,
}

/// Outcome of a professor creation: a brand-new record, or a silent merge
/// into an existing professor whose folded name matched.
#[derive(Debug, Clone)]
pub enum ProfessorOutcome {
  Created(Professor),
  Merged(Professor),
}

impl ProfessorOutcome {
  pub fn professor(&self) -> &Professor {
    match self {
      Self::Created(p) | Self::Merged(p) => p,
    }
  }
}

/// Field updates for an existing professor. A `Some` subject list replaces
/// the professor's subject set wholesale; the store reconciles both sides
/// of the link by set difference against the previous list.
#[derive(Debug, Clone, Default)]
pub struct ProfessorUpdate {
  pub name:        Option<String>,
  pub department:  Option<Option<String>>,
  pub subject_ids: Option<Vec<Uuid>>,
}

/// Flattened professor row for the admin overview: faculty and subject
/// references resolved to names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorDetails {
  pub professor_id:  Uuid,
  pub name:          String,
  pub faculty_name:  String,
  pub subject_names: Vec<String>,
  pub rating_stats:  RatingStats,
}
