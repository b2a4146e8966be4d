//! Error types for `catedra-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("faculty not found: {0}")]
  FacultyNotFound(Uuid),

  #[error("subject not found: {0}")]
  SubjectNotFound(Uuid),

  #[error("professor not found: {0}")]
  ProfessorNotFound(Uuid),

  #[error("rating not found: {0}")]
  RatingNotFound(Uuid),

  #[error("report not found: {0}")]
  ReportNotFound(Uuid),

  #[error("a subject with this name already exists in this faculty: {0:?}")]
  DuplicateSubject(String),

  #[error("a professor with this name already exists in this faculty: {0:?}")]
  DuplicateProfessor(String),

  #[error("department does not belong to this faculty: {0}")]
  InvalidDepartment(Uuid),

  #[error("report {0} does not reference a valid rating and professor")]
  InvalidReport(Uuid),

  #[error("report {0} is already resolved")]
  ReportAlreadyResolved(Uuid),

  #[error("score {0} is out of range (expected 1–5)")]
  InvalidScore(f64),

  /// One or more steps of a multi-document cleanup failed; the remaining
  /// steps were still attempted.
  #[error("partial cleanup failure: {}", failed.join(", "))]
  PartialCleanup { failed: Vec<String> },

  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
