//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Id arrays, vote arrays,
//! and the rating-statistics snapshot are stored as compact JSON. UUIDs are
//! stored as hyphenated lowercase strings.

use catedra_core::{
  activity::{ActivityAction, ActivityEntry, EntityKind, EntityRef},
  faculty::{Department, Faculty},
  professor::{Professor, RatingStats},
  rating::{Rating, Scores},
  report::{Report, ReportStatus},
  subject::Subject,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Id and string arrays ────────────────────────────────────────────────────

pub fn encode_ids(ids: &[Uuid]) -> Result<String> {
  let strings: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
  Ok(serde_json::to_string(&strings)?)
}

pub fn decode_ids(s: &str) -> Result<Vec<Uuid>> {
  let strings: Vec<String> = serde_json::from_str(s)?;
  strings.iter().map(|s| decode_uuid(s)).collect()
}

pub fn encode_strings(values: &[String]) -> Result<String> {
  Ok(serde_json::to_string(values)?)
}

pub fn decode_strings(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── RatingStats ─────────────────────────────────────────────────────────────

pub fn encode_stats(stats: &RatingStats) -> Result<String> {
  Ok(serde_json::to_string(stats)?)
}

pub fn decode_stats(s: &str) -> Result<RatingStats> {
  Ok(serde_json::from_str(s)?)
}

// ─── ReportStatus ────────────────────────────────────────────────────────────

pub fn encode_status(status: ReportStatus) -> &'static str {
  match status {
    ReportStatus::Pending => "pending",
    ReportStatus::Deleted => "deleted",
    ReportStatus::Rejected => "rejected",
  }
}

pub fn decode_status(s: &str) -> Result<ReportStatus> {
  match s {
    "pending" => Ok(ReportStatus::Pending),
    "deleted" => Ok(ReportStatus::Deleted),
    "rejected" => Ok(ReportStatus::Rejected),
    other => Err(Error::Decode(format!("unknown report status: {other:?}"))),
  }
}

// ─── ActivityAction ──────────────────────────────────────────────────────────

pub fn encode_action(action: ActivityAction) -> &'static str {
  match action {
    ActivityAction::CreateFaculty => "create_faculty",
    ActivityAction::UpdateFaculty => "update_faculty",
    ActivityAction::DeleteFaculty => "delete_faculty",
    ActivityAction::CreateSubject => "create_subject",
    ActivityAction::UpdateSubject => "update_subject",
    ActivityAction::DeleteSubject => "delete_subject",
    ActivityAction::CreateProfessor => "create_professor",
    ActivityAction::UpdateProfessor => "update_professor",
    ActivityAction::DeleteProfessor => "delete_professor",
  }
}

pub fn decode_action(s: &str) -> Result<ActivityAction> {
  match s {
    "create_faculty" => Ok(ActivityAction::CreateFaculty),
    "update_faculty" => Ok(ActivityAction::UpdateFaculty),
    "delete_faculty" => Ok(ActivityAction::DeleteFaculty),
    "create_subject" => Ok(ActivityAction::CreateSubject),
    "update_subject" => Ok(ActivityAction::UpdateSubject),
    "delete_subject" => Ok(ActivityAction::DeleteSubject),
    "create_professor" => Ok(ActivityAction::CreateProfessor),
    "update_professor" => Ok(ActivityAction::UpdateProfessor),
    "delete_professor" => Ok(ActivityAction::DeleteProfessor),
    other => Err(Error::Decode(format!("unknown activity action: {other:?}"))),
  }
}

// ─── EntityKind ──────────────────────────────────────────────────────────────

pub fn encode_kind(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Faculty => "faculty",
    EntityKind::Subject => "subject",
    EntityKind::Professor => "professor",
  }
}

pub fn decode_kind(s: &str) -> Result<EntityKind> {
  match s {
    "faculty" => Ok(EntityKind::Faculty),
    "subject" => Ok(EntityKind::Subject),
    "professor" => Ok(EntityKind::Professor),
    other => Err(Error::Decode(format!("unknown entity kind: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `faculties` row.
pub struct RawFaculty {
  pub faculty_id:   String,
  pub name:         String,
  pub abbreviation: String,
  pub created_at:   String,
}

impl RawFaculty {
  pub fn into_faculty(self) -> Result<Faculty> {
    Ok(Faculty {
      faculty_id:   decode_uuid(&self.faculty_id)?,
      name:         self.name,
      abbreviation: self.abbreviation,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `departments` row.
pub struct RawDepartment {
  pub department_id: String,
  pub faculty_id:    String,
  pub name:          String,
}

impl RawDepartment {
  pub fn into_department(self) -> Result<Department> {
    Ok(Department {
      department_id: decode_uuid(&self.department_id)?,
      faculty_id:    decode_uuid(&self.faculty_id)?,
      name:          self.name,
    })
  }
}

/// Raw strings read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id:      String,
  pub faculty_id:      String,
  pub department_id:   Option<String>,
  pub name:            String,
  pub normalized_name: String,
  pub credits:         i64,
  pub description:     Option<String>,
  pub professor_ids:   String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      subject_id:      decode_uuid(&self.subject_id)?,
      faculty_id:      decode_uuid(&self.faculty_id)?,
      department_id:   self
        .department_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      name:            self.name,
      normalized_name: self.normalized_name,
      credits:         self.credits as u32,
      description:     self.description,
      professor_ids:   decode_ids(&self.professor_ids)?,
    })
  }
}

/// Raw strings read directly from a `professors` row.
pub struct RawProfessor {
  pub professor_id: String,
  pub faculty_id:   String,
  pub name:         String,
  pub department:   Option<String>,
  pub subject_ids:  String,
  pub rating_stats: String,
  pub created_at:   String,
}

impl RawProfessor {
  pub fn into_professor(self) -> Result<Professor> {
    Ok(Professor {
      professor_id: decode_uuid(&self.professor_id)?,
      faculty_id:   decode_uuid(&self.faculty_id)?,
      name:         self.name,
      department:   self.department,
      subject_ids:  decode_ids(&self.subject_ids)?,
      rating_stats: decode_stats(&self.rating_stats)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `ratings` row.
pub struct RawRating {
  pub rating_id:     String,
  pub professor_id:  String,
  pub subject_id:    String,
  pub general:       f64,
  pub explanation:   f64,
  pub accessibility: f64,
  pub difficulty:    f64,
  pub attendance:    f64,
  pub would_retake:  bool,
  pub comment:       String,
  pub likes:         String,
  pub dislikes:      String,
  pub created_at:    String,
}

impl RawRating {
  pub fn into_rating(self) -> Result<Rating> {
    Ok(Rating {
      rating_id:    decode_uuid(&self.rating_id)?,
      professor_id: decode_uuid(&self.professor_id)?,
      subject_id:   decode_uuid(&self.subject_id)?,
      scores:       Scores {
        general:       self.general,
        explanation:   self.explanation,
        accessibility: self.accessibility,
        difficulty:    self.difficulty,
        attendance:    self.attendance,
      },
      would_retake: self.would_retake,
      comment:      self.comment,
      likes:        decode_strings(&self.likes)?,
      dislikes:     decode_strings(&self.dislikes)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `reports` row.
pub struct RawReport {
  pub report_id:      String,
  pub rating_id:      Option<String>,
  pub professor_id:   Option<String>,
  pub subject_id:     String,
  pub rating_comment: String,
  pub rating_date:    String,
  pub reasons:        String,
  pub comment:        Option<String>,
  pub status:         String,
  pub reported_at:    String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      report_id:      decode_uuid(&self.report_id)?,
      // A malformed reference decodes to None rather than failing the whole
      // row; resolution rejects it explicitly.
      rating_id:      self
        .rating_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok()),
      professor_id:   self
        .professor_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok()),
      subject_id:     decode_uuid(&self.subject_id)?,
      rating_comment: self.rating_comment,
      rating_date:    decode_dt(&self.rating_date)?,
      reasons:        decode_strings(&self.reasons)?,
      comment:        self.comment,
      status:         decode_status(&self.status)?,
      reported_at:    decode_dt(&self.reported_at)?,
    })
  }
}

/// Raw strings read directly from an `activity_log` row.
pub struct RawActivity {
  pub activity_id: String,
  pub action:      String,
  pub entity_kind: String,
  pub entity_id:   String,
  pub changes:     Option<String>,
  pub timestamp:   String,
}

impl RawActivity {
  pub fn into_entry(self) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
      activity_id: decode_uuid(&self.activity_id)?,
      action:      decode_action(&self.action)?,
      entity:      EntityRef {
        kind: decode_kind(&self.entity_kind)?,
        id:   decode_uuid(&self.entity_id)?,
      },
      changes:     self.changes,
      timestamp:   decode_dt(&self.timestamp)?,
    })
  }
}
