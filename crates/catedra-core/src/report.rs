//! Report — a moderation ticket referencing one rating.
//!
//! A report denormalizes the reported rating's comment, date, professor,
//! and subject at report time, so the ticket stays meaningful after the
//! rating is deleted through the moderation workflow itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation state machine: `pending` → `deleted` | `rejected`.
/// No transition leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
  Pending,
  Deleted,
  Rejected,
}

impl ReportStatus {
  pub fn is_terminal(&self) -> bool { !matches!(self, Self::Pending) }
}

/// The rating and professor references are optional so that malformed
/// historical tickets can still be listed; resolving such a ticket fails
/// with a validation error instead of being silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
  pub report_id:      Uuid,
  pub rating_id:      Option<Uuid>,
  pub professor_id:   Option<Uuid>,
  pub subject_id:     Uuid,
  /// Snapshot of the reported rating's comment at report time.
  pub rating_comment: String,
  /// Snapshot of the reported rating's creation date.
  pub rating_date:    DateTime<Utc>,
  pub reasons:        Vec<String>,
  pub comment:        Option<String>,
  pub status:         ReportStatus,
  pub reported_at:    DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::create_report`].
#[derive(Debug, Clone)]
pub struct NewReport {
  pub rating_id: Uuid,
  pub reasons:   Vec<String>,
  pub comment:   Option<String>,
}
