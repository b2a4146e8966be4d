//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use catedra_core::{
  activity::{
    ActivityAction, ActivityEntry, DashboardCounts, EntityKind, EntityRef,
    ResolvedActivity,
  },
  faculty::{Department, Faculty},
  name::{fold, title_case},
  professor::{
    NewProfessor, Professor, ProfessorDetails, ProfessorOutcome,
    ProfessorUpdate, RatingStats,
  },
  rating::{NewRating, Rating},
  report::{NewReport, Report, ReportStatus},
  store::{CatalogStore, ListFilter, Paged, RatingPage},
  subject::{NewSubject, Subject, SubjectUpdate},
};

use crate::{
  Error, Result,
  encode::{
    RawActivity, RawDepartment, RawFaculty, RawProfessor, RawRating,
    RawReport, RawSubject, encode_action, encode_dt, encode_ids, encode_kind,
    encode_stats, encode_status, encode_strings, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const FACULTY_COLS: &str = "faculty_id, name, abbreviation, created_at";

const SUBJECT_COLS: &str = "subject_id, faculty_id, department_id, name, \
                            normalized_name, credits, description, \
                            professor_ids";

const PROFESSOR_COLS: &str = "professor_id, faculty_id, name, department, \
                              subject_ids, rating_stats, created_at";

const RATING_COLS: &str = "rating_id, professor_id, subject_id, general, \
                           explanation, accessibility, difficulty, \
                           attendance, would_retake, comment, likes, \
                           dislikes, created_at";

const REPORT_COLS: &str = "report_id, rating_id, professor_id, subject_id, \
                           rating_comment, rating_date, reasons, comment, \
                           status, reported_at";

fn faculty_row(row: &rusqlite::Row) -> rusqlite::Result<RawFaculty> {
  Ok(RawFaculty {
    faculty_id:   row.get(0)?,
    name:         row.get(1)?,
    abbreviation: row.get(2)?,
    created_at:   row.get(3)?,
  })
}

fn subject_row(row: &rusqlite::Row) -> rusqlite::Result<RawSubject> {
  Ok(RawSubject {
    subject_id:      row.get(0)?,
    faculty_id:      row.get(1)?,
    department_id:   row.get(2)?,
    name:            row.get(3)?,
    normalized_name: row.get(4)?,
    credits:         row.get(5)?,
    description:     row.get(6)?,
    professor_ids:   row.get(7)?,
  })
}

fn professor_row(row: &rusqlite::Row) -> rusqlite::Result<RawProfessor> {
  Ok(RawProfessor {
    professor_id: row.get(0)?,
    faculty_id:   row.get(1)?,
    name:         row.get(2)?,
    department:   row.get(3)?,
    subject_ids:  row.get(4)?,
    rating_stats: row.get(5)?,
    created_at:   row.get(6)?,
  })
}

fn rating_row(row: &rusqlite::Row) -> rusqlite::Result<RawRating> {
  Ok(RawRating {
    rating_id:     row.get(0)?,
    professor_id:  row.get(1)?,
    subject_id:    row.get(2)?,
    general:       row.get(3)?,
    explanation:   row.get(4)?,
    accessibility: row.get(5)?,
    difficulty:    row.get(6)?,
    attendance:    row.get(7)?,
    would_retake:  row.get(8)?,
    comment:       row.get(9)?,
    likes:         row.get(10)?,
    dislikes:      row.get(11)?,
    created_at:    row.get(12)?,
  })
}

fn report_row(row: &rusqlite::Row) -> rusqlite::Result<RawReport> {
  Ok(RawReport {
    report_id:      row.get(0)?,
    rating_id:      row.get(1)?,
    professor_id:   row.get(2)?,
    subject_id:     row.get(3)?,
    rating_comment: row.get(4)?,
    rating_date:    row.get(5)?,
    reasons:        row.get(6)?,
    comment:        row.get(7)?,
    status:         row.get(8)?,
    reported_at:    row.get(9)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Catedra catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Fetch helpers ─────────────────────────────────────────────────────────

  async fn fetch_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SUBJECT_COLS} FROM subjects WHERE subject_id = ?1"),
              rusqlite::params![id_str],
              subject_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawSubject::into_subject).transpose()
  }

  async fn fetch_professor(&self, id: Uuid) -> Result<Option<Professor>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawProfessor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFESSOR_COLS} FROM professors WHERE professor_id = ?1"),
              rusqlite::params![id_str],
              professor_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawProfessor::into_professor).transpose()
  }

  async fn fetch_rating(&self, id: Uuid) -> Result<Option<Rating>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawRating> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RATING_COLS} FROM ratings WHERE rating_id = ?1"),
              rusqlite::params![id_str],
              rating_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawRating::into_rating).transpose()
  }

  async fn fetch_report(&self, id: Uuid) -> Result<Option<Report>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {REPORT_COLS} FROM reports WHERE report_id = ?1"),
              rusqlite::params![id_str],
              report_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawReport::into_report).transpose()
  }

  // ── Link-side writers ─────────────────────────────────────────────────────

  async fn write_professor_subjects(
    &self,
    professor_id: Uuid,
    subject_ids: &[Uuid],
  ) -> Result<()> {
    let id_str = encode_uuid(professor_id);
    let ids_str = encode_ids(subject_ids)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE professors SET subject_ids = ?1 WHERE professor_id = ?2",
          rusqlite::params![ids_str, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn write_subject_professors(
    &self,
    subject_id: Uuid,
    professor_ids: &[Uuid],
  ) -> Result<()> {
    let id_str = encode_uuid(subject_id);
    let ids_str = encode_ids(professor_ids)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE subjects SET professor_ids = ?1 WHERE subject_id = ?2",
          rusqlite::params![ids_str, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Remove `professor_id` from a subject's professor list, if present.
  async fn pull_professor_from_subject(
    &self,
    subject_id: Uuid,
    professor_id: Uuid,
  ) -> Result<()> {
    if let Some(mut subject) = self.fetch_subject(subject_id).await? {
      if subject.professor_ids.contains(&professor_id) {
        subject.professor_ids.retain(|id| *id != professor_id);
        self
          .write_subject_professors(subject_id, &subject.professor_ids)
          .await?;
      }
    }
    Ok(())
  }

  /// Remove `subject_id` from a professor's subject list, if present.
  async fn pull_subject_from_professor(
    &self,
    professor_id: Uuid,
    subject_id: Uuid,
  ) -> Result<()> {
    if let Some(mut professor) = self.fetch_professor(professor_id).await? {
      if professor.subject_ids.contains(&subject_id) {
        professor.subject_ids.retain(|id| *id != subject_id);
        self
          .write_professor_subjects(professor_id, &professor.subject_ids)
          .await?;
      }
    }
    Ok(())
  }

  // ── Validation helpers ────────────────────────────────────────────────────

  async fn require_faculty(&self, id: Uuid) -> Result<Faculty> {
    self
      .get_faculty(id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::FacultyNotFound(id)))
  }

  /// A department reference on a subject must belong to the same faculty.
  async fn check_department(
    &self,
    department_id: Uuid,
    faculty_id: Uuid,
  ) -> Result<()> {
    let dept_str = encode_uuid(department_id);
    let fac_str = encode_uuid(faculty_id);
    let ok: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM departments
               WHERE department_id = ?1 AND faculty_id = ?2",
              rusqlite::params![dept_str, fac_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    if ok {
      Ok(())
    } else {
      Err(Error::Core(catedra_core::Error::InvalidDepartment(
        department_id,
      )))
    }
  }

  /// Every id in `subject_ids` must name an existing subject.
  async fn require_subjects(&self, subject_ids: &[Uuid]) -> Result<()> {
    for id in subject_ids {
      if self.fetch_subject(*id).await?.is_none() {
        return Err(Error::Core(catedra_core::Error::SubjectNotFound(*id)));
      }
    }
    Ok(())
  }

  // ── Cleanup helpers ───────────────────────────────────────────────────────

  async fn delete_ratings_matching(
    &self,
    column: &'static str,
    id: Uuid,
  ) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("DELETE FROM ratings WHERE {column} = ?1"),
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_row(
    &self,
    table: &'static str,
    id_column: &'static str,
    id: Uuid,
  ) -> Result<usize> {
    let id_str = encode_uuid(id);
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE {id_column} = ?1"),
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(n)
  }
}

/// Record a failed cleanup step without aborting the remaining steps.
fn note_failure(failed: &mut Vec<String>, step: &str, err: Error) {
  tracing::warn!(step, error = %err, "cleanup step failed");
  failed.push(step.to_string());
}

fn settled(failed: Vec<String>) -> Result<()> {
  if failed.is_empty() {
    Ok(())
  } else {
    Err(Error::Core(catedra_core::Error::PartialCleanup { failed }))
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Faculties ─────────────────────────────────────────────────────────────

  async fn add_faculty(
    &self,
    name: String,
    abbreviation: String,
  ) -> Result<Faculty> {
    let faculty = Faculty {
      faculty_id: Uuid::new_v4(),
      name,
      abbreviation,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(faculty.faculty_id);
    let name = faculty.name.clone();
    let abbr = faculty.abbreviation.clone();
    let at_str = encode_dt(faculty.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO faculties (faculty_id, name, abbreviation, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, abbr, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(faculty)
  }

  async fn get_faculty(&self, id: Uuid) -> Result<Option<Faculty>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawFaculty> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {FACULTY_COLS} FROM faculties WHERE faculty_id = ?1"),
              rusqlite::params![id_str],
              faculty_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawFaculty::into_faculty).transpose()
  }

  async fn list_faculties(&self) -> Result<Vec<Faculty>> {
    let raws: Vec<RawFaculty> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACULTY_COLS} FROM faculties ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], faculty_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawFaculty::into_faculty).collect()
  }

  async fn update_faculty(
    &self,
    id: Uuid,
    name: String,
    abbreviation: String,
  ) -> Result<Faculty> {
    let id_str = encode_uuid(id);
    let name_arg = name.clone();
    let abbr_arg = abbreviation.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE faculties SET name = ?1, abbreviation = ?2 WHERE faculty_id = ?3",
          rusqlite::params![name_arg, abbr_arg, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::Core(catedra_core::Error::FacultyNotFound(id)));
    }
    self.require_faculty(id).await
  }

  async fn delete_faculty(&self, id: Uuid) -> Result<()> {
    let faculty = self.require_faculty(id).await?;
    let subjects = self
      .list_faculty_subjects(faculty.faculty_id, ListFilter::default())
      .await?;
    let professors = self
      .list_faculty_professors(faculty.faculty_id, ListFilter::default())
      .await?;

    let mut failed = Vec::new();

    // Each professor and subject goes through its own delete operation so
    // links reaching outside this faculty are unhooked on both sides.
    for professor in &professors {
      if let Err(e) = self.delete_professor(professor.professor_id).await {
        note_failure(&mut failed, "professor", e);
      }
    }
    for subject in &subjects {
      if let Err(e) = self.delete_subject(subject.subject_id).await {
        note_failure(&mut failed, "subject", e);
      }
    }

    let fac_str = encode_uuid(id);
    if let Err(e) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM departments WHERE faculty_id = ?1",
          rusqlite::params![fac_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::from)
    {
      note_failure(&mut failed, "departments", e);
    }
    if let Err(e) = self.delete_row("faculties", "faculty_id", id).await {
      note_failure(&mut failed, "faculty", e);
    }

    settled(failed)
  }

  async fn add_department(
    &self,
    faculty_id: Uuid,
    name: String,
  ) -> Result<Department> {
    self.require_faculty(faculty_id).await?;

    let department = Department {
      department_id: Uuid::new_v4(),
      faculty_id,
      name,
    };

    let id_str = encode_uuid(department.department_id);
    let fac_str = encode_uuid(faculty_id);
    let name = department.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO departments (department_id, faculty_id, name)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, fac_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(department)
  }

  async fn list_departments(&self, faculty_id: Uuid) -> Result<Vec<Department>> {
    let fac_str = encode_uuid(faculty_id);
    let raws: Vec<RawDepartment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT department_id, faculty_id, name FROM departments
           WHERE faculty_id = ?1 ORDER BY name",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![fac_str], |row| {
            Ok(RawDepartment {
              department_id: row.get(0)?,
              faculty_id:    row.get(1)?,
              name:          row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(RawDepartment::into_department)
      .collect()
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn add_subject(&self, input: NewSubject) -> Result<Subject> {
    self.require_faculty(input.faculty_id).await?;
    if let Some(dept) = input.department_id {
      self.check_department(dept, input.faculty_id).await?;
    }

    let normalized = fold(&input.name);
    let fac_str = encode_uuid(input.faculty_id);
    let norm_arg = normalized.clone();
    let duplicate: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM subjects
               WHERE faculty_id = ?1 AND normalized_name = ?2",
              rusqlite::params![fac_str, norm_arg],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    if duplicate {
      return Err(Error::Core(catedra_core::Error::DuplicateSubject(
        input.name,
      )));
    }

    let subject = Subject {
      subject_id:      Uuid::new_v4(),
      faculty_id:      input.faculty_id,
      department_id:   input.department_id,
      name:            input.name,
      normalized_name: normalized,
      credits:         input.credits,
      description:     input.description,
      professor_ids:   Vec::new(),
    };

    let id_str = encode_uuid(subject.subject_id);
    let fac_str = encode_uuid(subject.faculty_id);
    let dept_str = subject.department_id.map(encode_uuid);
    let name = subject.name.clone();
    let norm = subject.normalized_name.clone();
    let credits = i64::from(subject.credits);
    let description = subject.description.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (
             subject_id, faculty_id, department_id, name, normalized_name,
             credits, description, professor_ids
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, '[]')",
          rusqlite::params![
            id_str,
            fac_str,
            dept_str,
            name,
            norm,
            credits,
            description,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }

  async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    self.fetch_subject(id).await
  }

  async fn list_faculty_subjects(
    &self,
    faculty_id: Uuid,
    filter: ListFilter,
  ) -> Result<Vec<Subject>> {
    let fac_str = encode_uuid(faculty_id);
    let pattern = filter.search.as_deref().map(|s| format!("%{}%", fold(s)));
    let limit = filter.limit.map(i64::from).unwrap_or(-1);

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLS} FROM subjects
           WHERE faculty_id = ?1
             AND (?2 IS NULL OR normalized_name LIKE ?2)
           ORDER BY name
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![fac_str, pattern.as_deref(), limit],
            subject_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  async fn list_subjects(
    &self,
    page: u32,
    per_page: u32,
    search: Option<String>,
  ) -> Result<Paged<Subject>> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let pattern = search.as_deref().map(|s| format!("%{s}%"));
    let limit = i64::from(per_page);
    // Page numbers arrive straight from query parameters; saturate instead
    // of trusting the product to fit.
    let offset = i64::from(page - 1).saturating_mul(limit);

    let (total, raws): (u64, Vec<RawSubject>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM subjects
           WHERE (?1 IS NULL OR name LIKE ?1)",
          rusqlite::params![pattern.as_deref()],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBJECT_COLS} FROM subjects
           WHERE (?1 IS NULL OR name LIKE ?1)
           ORDER BY name
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern.as_deref(), limit, offset],
            subject_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total as u64, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawSubject::into_subject)
      .collect::<Result<Vec<_>>>()?;
    let total_pages = total.div_ceil(u64::from(per_page)) as u32;

    Ok(Paged { items, total, page, total_pages })
  }

  async fn update_subject(
    &self,
    id: Uuid,
    update: SubjectUpdate,
  ) -> Result<Subject> {
    let mut subject = self
      .fetch_subject(id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::SubjectNotFound(id)))?;

    if let Some(Some(dept)) = update.department_id {
      self.check_department(dept, subject.faculty_id).await?;
    }

    if let Some(name) = update.name {
      let normalized = fold(&name);
      if normalized != subject.normalized_name {
        let fac_str = encode_uuid(subject.faculty_id);
        let norm_arg = normalized.clone();
        let id_str = encode_uuid(id);
        let duplicate: bool = self
          .conn
          .call(move |conn| {
            Ok(
              conn
                .query_row(
                  "SELECT 1 FROM subjects
                   WHERE faculty_id = ?1 AND normalized_name = ?2
                     AND subject_id != ?3",
                  rusqlite::params![fac_str, norm_arg, id_str],
                  |_| Ok(true),
                )
                .optional()?
                .unwrap_or(false),
            )
          })
          .await?;
        if duplicate {
          return Err(Error::Core(catedra_core::Error::DuplicateSubject(name)));
        }
      }
      subject.name = name;
      subject.normalized_name = normalized;
    }
    if let Some(credits) = update.credits {
      subject.credits = credits;
    }
    if let Some(description) = update.description {
      subject.description = description;
    }
    if let Some(department_id) = update.department_id {
      subject.department_id = department_id;
    }

    let id_str = encode_uuid(id);
    let name = subject.name.clone();
    let norm = subject.normalized_name.clone();
    let credits = i64::from(subject.credits);
    let description = subject.description.clone();
    let dept_str = subject.department_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE subjects
           SET name = ?1, normalized_name = ?2, credits = ?3,
               description = ?4, department_id = ?5
           WHERE subject_id = ?6",
          rusqlite::params![name, norm, credits, description, dept_str, id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }

  async fn delete_subject(&self, id: Uuid) -> Result<()> {
    let subject = self
      .fetch_subject(id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::SubjectNotFound(id)))?;

    let mut failed = Vec::new();

    for professor_id in &subject.professor_ids {
      if let Err(e) = self.pull_subject_from_professor(*professor_id, id).await
      {
        note_failure(&mut failed, "professor link", e);
      }
    }
    if let Err(e) = self.delete_ratings_matching("subject_id", id).await {
      note_failure(&mut failed, "ratings", e);
    }
    if let Err(e) = self.delete_row("subjects", "subject_id", id).await {
      note_failure(&mut failed, "subject", e);
    }

    settled(failed)
  }

  async fn subject_professors(&self, subject_id: Uuid) -> Result<Vec<Professor>> {
    let subject = self
      .fetch_subject(subject_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::SubjectNotFound(subject_id)))?;

    let mut professors = Vec::with_capacity(subject.professor_ids.len());
    for id in subject.professor_ids {
      // Dangling references are skipped rather than failing the listing.
      if let Some(professor) = self.fetch_professor(id).await? {
        professors.push(professor);
      }
    }
    Ok(professors)
  }

  // ── Professors ────────────────────────────────────────────────────────────

  async fn create_professor(
    &self,
    input: NewProfessor,
  ) -> Result<ProfessorOutcome> {
    self.require_faculty(input.faculty_id).await?;
    self.require_subjects(&input.subject_ids).await?;

    // Fold-based duplicate search within the faculty. A match degrades the
    // create into attaches against the existing record.
    let folded = fold(&input.name);
    let existing = self
      .list_faculty_professors(input.faculty_id, ListFilter::default())
      .await?
      .into_iter()
      .find(|p| fold(&p.name) == folded);

    if let Some(professor) = existing {
      for subject_id in &input.subject_ids {
        self.attach(professor.professor_id, *subject_id).await?;
      }
      let merged = self
        .fetch_professor(professor.professor_id)
        .await?
        .ok_or(Error::Core(catedra_core::Error::ProfessorNotFound(
          professor.professor_id,
        )))?;
      return Ok(ProfessorOutcome::Merged(merged));
    }

    let professor = Professor {
      professor_id: Uuid::new_v4(),
      faculty_id:   input.faculty_id,
      name:         title_case(&input.name),
      department:   input.department.filter(|d| !d.is_empty()),
      subject_ids:  input.subject_ids.clone(),
      rating_stats: RatingStats::default(),
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(professor.professor_id);
    let fac_str = encode_uuid(professor.faculty_id);
    let name = professor.name.clone();
    let department = professor.department.clone();
    let ids_str = encode_ids(&professor.subject_ids)?;
    let stats_str = encode_stats(&professor.rating_stats)?;
    let at_str = encode_dt(professor.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO professors (
             professor_id, faculty_id, name, department, subject_ids,
             rating_stats, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            fac_str,
            name,
            department,
            ids_str,
            stats_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    // The professor row already lists its subjects; attach fills in the
    // subject side of each link.
    for subject_id in &input.subject_ids {
      self.attach(professor.professor_id, *subject_id).await?;
    }

    Ok(ProfessorOutcome::Created(professor))
  }

  async fn get_professor(&self, id: Uuid) -> Result<Option<Professor>> {
    self.fetch_professor(id).await
  }

  async fn list_faculty_professors(
    &self,
    faculty_id: Uuid,
    filter: ListFilter,
  ) -> Result<Vec<Professor>> {
    let fac_str = encode_uuid(faculty_id);
    let pattern = filter.search.as_deref().map(|s| format!("%{s}%"));
    let limit = filter.limit.map(i64::from).unwrap_or(-1);

    let raws: Vec<RawProfessor> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFESSOR_COLS} FROM professors
           WHERE faculty_id = ?1
             AND (?2 IS NULL OR name LIKE ?2)
           ORDER BY name
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![fac_str, pattern.as_deref(), limit],
            professor_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawProfessor::into_professor).collect()
  }

  async fn list_professor_details(&self) -> Result<Vec<ProfessorDetails>> {
    let (raws, faculty_names, subject_names): (
      Vec<RawProfessor>,
      HashMap<String, String>,
      HashMap<String, String>,
    ) = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFESSOR_COLS} FROM professors ORDER BY name"
        ))?;
        let raws = stmt
          .query_map([], professor_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare("SELECT faculty_id, name FROM faculties")?;
        let faculty_names = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<HashMap<_, _>>>()?;

        let mut stmt = conn.prepare("SELECT subject_id, name FROM subjects")?;
        let subject_names = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<HashMap<_, _>>>()?;

        Ok((raws, faculty_names, subject_names))
      })
      .await?;

    let mut details = Vec::with_capacity(raws.len());
    for raw in raws {
      let professor = raw.into_professor()?;
      let faculty_name = faculty_names
        .get(&encode_uuid(professor.faculty_id))
        .cloned()
        .unwrap_or_else(|| "(deleted faculty)".to_string());
      let subject_names = professor
        .subject_ids
        .iter()
        .filter_map(|id| subject_names.get(&encode_uuid(*id)).cloned())
        .collect();

      details.push(ProfessorDetails {
        professor_id: professor.professor_id,
        name: professor.name,
        faculty_name,
        subject_names,
        rating_stats: professor.rating_stats,
      });
    }
    Ok(details)
  }

  async fn update_professor(
    &self,
    id: Uuid,
    update: ProfessorUpdate,
  ) -> Result<Professor> {
    let mut professor = self
      .fetch_professor(id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::ProfessorNotFound(id)))?;

    // Renames use an exact (case-sensitive) duplicate check, unlike the
    // fold-based search on creation. See DESIGN.md for the rationale.
    if let Some(name) = update.name {
      let trimmed = name.trim().to_string();
      let fac_str = encode_uuid(professor.faculty_id);
      let name_arg = trimmed.clone();
      let id_str = encode_uuid(id);
      let duplicate: bool = self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT 1 FROM professors
                 WHERE faculty_id = ?1 AND name = ?2 AND professor_id != ?3",
                rusqlite::params![fac_str, name_arg, id_str],
                |_| Ok(true),
              )
              .optional()?
              .unwrap_or(false),
          )
        })
        .await?;
      if duplicate {
        return Err(Error::Core(catedra_core::Error::DuplicateProfessor(
          trimmed,
        )));
      }
      professor.name = trimmed;
    }

    if let Some(department) = update.department {
      professor.department = department.filter(|d| !d.is_empty());
    }

    if let Some(new_ids) = update.subject_ids {
      self.require_subjects(&new_ids).await?;

      // Set difference against the previous list: a blind overwrite of both
      // sides would orphan the professor's entry in removed subjects.
      for added in new_ids.iter().filter(|id| !professor.subject_ids.contains(id))
      {
        if let Some(mut subject) = self.fetch_subject(*added).await? {
          if !subject.professor_ids.contains(&professor.professor_id) {
            subject.professor_ids.push(professor.professor_id);
            self
              .write_subject_professors(*added, &subject.professor_ids)
              .await?;
          }
        }
      }
      for removed in professor
        .subject_ids
        .clone()
        .iter()
        .filter(|id| !new_ids.contains(id))
      {
        self
          .pull_professor_from_subject(*removed, professor.professor_id)
          .await?;
      }

      professor.subject_ids = new_ids;
    }

    let id_str = encode_uuid(id);
    let name = professor.name.clone();
    let department = professor.department.clone();
    let ids_str = encode_ids(&professor.subject_ids)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE professors
           SET name = ?1, department = ?2, subject_ids = ?3
           WHERE professor_id = ?4",
          rusqlite::params![name, department, ids_str, id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(professor)
  }

  async fn delete_professor(&self, id: Uuid) -> Result<()> {
    let professor = self
      .fetch_professor(id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::ProfessorNotFound(id)))?;

    let mut failed = Vec::new();

    if let Err(e) = self.delete_row("professors", "professor_id", id).await {
      note_failure(&mut failed, "professor", e);
    }
    if let Err(e) = self.delete_ratings_matching("professor_id", id).await {
      note_failure(&mut failed, "ratings", e);
    }
    for subject_id in &professor.subject_ids {
      if let Err(e) = self.pull_professor_from_subject(*subject_id, id).await {
        note_failure(&mut failed, "subject link", e);
      }
    }

    settled(failed)
  }

  async fn attach(&self, professor_id: Uuid, subject_id: Uuid) -> Result<()> {
    let mut professor = self
      .fetch_professor(professor_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::ProfessorNotFound(
        professor_id,
      )))?;
    let mut subject = self
      .fetch_subject(subject_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::SubjectNotFound(subject_id)))?;

    // Idempotent: a link present in both directions writes nothing.
    if !professor.subject_ids.contains(&subject_id) {
      professor.subject_ids.push(subject_id);
      self
        .write_professor_subjects(professor_id, &professor.subject_ids)
        .await?;
    }
    if !subject.professor_ids.contains(&professor_id) {
      subject.professor_ids.push(professor_id);
      self
        .write_subject_professors(subject_id, &subject.professor_ids)
        .await?;
    }
    Ok(())
  }

  async fn recompute_rating_stats(
    &self,
    professor_id: Uuid,
  ) -> Result<RatingStats> {
    let id_str = encode_uuid(professor_id);

    let rows: Vec<(f64, f64, f64, f64, f64, bool)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT general, explanation, accessibility, difficulty,
                  attendance, would_retake
           FROM ratings WHERE professor_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
              row.get(5)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let total = rows.len() as u64;
    let stats = if total == 0 {
      // Zero-state reset: never leave stale values or NaN behind.
      RatingStats::default()
    } else {
      let n = total as f64;
      let would_retake_count =
        rows.iter().filter(|r| r.5).count() as u64;
      RatingStats {
        total_ratings:           total,
        average_general:         rows.iter().map(|r| r.0).sum::<f64>() / n,
        average_explanation:     rows.iter().map(|r| r.1).sum::<f64>() / n,
        average_accessibility:   rows.iter().map(|r| r.2).sum::<f64>() / n,
        average_difficulty:      rows.iter().map(|r| r.3).sum::<f64>() / n,
        average_attendance:      rows.iter().map(|r| r.4).sum::<f64>() / n,
        would_retake_count,
        would_retake_percentage: would_retake_count as f64 / n * 100.0,
      }
    };

    let id_str = encode_uuid(professor_id);
    let stats_str = encode_stats(&stats)?;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE professors SET rating_stats = ?1 WHERE professor_id = ?2",
          rusqlite::params![stats_str, id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::Core(catedra_core::Error::ProfessorNotFound(
        professor_id,
      )));
    }
    Ok(stats)
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn add_rating(&self, input: NewRating) -> Result<Rating> {
    input.scores.validate().map_err(Error::Core)?;

    if self.fetch_professor(input.professor_id).await?.is_none() {
      return Err(Error::Core(catedra_core::Error::ProfessorNotFound(
        input.professor_id,
      )));
    }
    if self.fetch_subject(input.subject_id).await?.is_none() {
      return Err(Error::Core(catedra_core::Error::SubjectNotFound(
        input.subject_id,
      )));
    }

    // A rating for a not-yet-linked pair links it.
    self.attach(input.professor_id, input.subject_id).await?;

    let rating = Rating {
      rating_id:    Uuid::new_v4(),
      professor_id: input.professor_id,
      subject_id:   input.subject_id,
      scores:       input.scores,
      would_retake: input.would_retake,
      comment:      input.comment,
      likes:        Vec::new(),
      dislikes:     Vec::new(),
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(rating.rating_id);
    let prof_str = encode_uuid(rating.professor_id);
    let subj_str = encode_uuid(rating.subject_id);
    let scores = rating.scores;
    let would_retake = rating.would_retake;
    let comment = rating.comment.clone();
    let at_str = encode_dt(rating.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO ratings (
             rating_id, professor_id, subject_id, general, explanation,
             accessibility, difficulty, attendance, would_retake, comment,
             likes, dislikes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, '[]', '[]', ?11)",
          rusqlite::params![
            id_str,
            prof_str,
            subj_str,
            scores.general,
            scores.explanation,
            scores.accessibility,
            scores.difficulty,
            scores.attendance,
            would_retake,
            comment,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    self.recompute_rating_stats(rating.professor_id).await?;

    Ok(rating)
  }

  async fn get_rating(&self, id: Uuid) -> Result<Option<Rating>> {
    self.fetch_rating(id).await
  }

  async fn list_professor_ratings(
    &self,
    professor_id: Uuid,
    page: u32,
    per_page: u32,
  ) -> Result<RatingPage> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let id_str = encode_uuid(professor_id);
    let limit = i64::from(per_page);
    let offset = i64::from(page - 1).saturating_mul(limit);

    let (total, raws): (u64, Vec<RawRating>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM ratings WHERE professor_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {RATING_COLS} FROM ratings
           WHERE professor_id = ?1
           ORDER BY created_at DESC
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str, limit, offset], rating_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total as u64, rows))
      })
      .await?;

    let ratings = raws
      .into_iter()
      .map(RawRating::into_rating)
      .collect::<Result<Vec<_>>>()?;

    let seen = offset as u64 + ratings.len() as u64;
    let next_page = (seen < total).then(|| page.saturating_add(1));

    Ok(RatingPage { ratings, next_page, total })
  }

  async fn toggle_like(
    &self,
    rating_id: Uuid,
    voter_id: String,
  ) -> Result<Rating> {
    let mut rating = self
      .fetch_rating(rating_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::RatingNotFound(rating_id)))?;

    if rating.likes.contains(&voter_id) {
      rating.likes.retain(|v| *v != voter_id);
    } else {
      rating.likes.push(voter_id.clone());
      // Legacy dislikes are scrubbed on every like so the two sets can
      // never both contain the voter.
      rating.dislikes.retain(|v| *v != voter_id);
    }

    let id_str = encode_uuid(rating_id);
    let likes_str = encode_strings(&rating.likes)?;
    let dislikes_str = encode_strings(&rating.dislikes)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE ratings SET likes = ?1, dislikes = ?2 WHERE rating_id = ?3",
          rusqlite::params![likes_str, dislikes_str, id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(rating)
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn create_report(&self, input: NewReport) -> Result<Report> {
    let rating = self
      .fetch_rating(input.rating_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::RatingNotFound(
        input.rating_id,
      )))?;

    let report = Report {
      report_id:      Uuid::new_v4(),
      rating_id:      Some(rating.rating_id),
      professor_id:   Some(rating.professor_id),
      subject_id:     rating.subject_id,
      rating_comment: rating.comment,
      rating_date:    rating.created_at,
      reasons:        input.reasons,
      comment:        input.comment,
      status:         ReportStatus::Pending,
      reported_at:    Utc::now(),
    };

    let id_str = encode_uuid(report.report_id);
    let rating_str = report.rating_id.map(encode_uuid);
    let prof_str = report.professor_id.map(encode_uuid);
    let subj_str = encode_uuid(report.subject_id);
    let rating_comment = report.rating_comment.clone();
    let rating_date = encode_dt(report.rating_date);
    let reasons_str = encode_strings(&report.reasons)?;
    let comment = report.comment.clone();
    let at_str = encode_dt(report.reported_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reports (
             report_id, rating_id, professor_id, subject_id, rating_comment,
             rating_date, reasons, comment, status, reported_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending', ?9)",
          rusqlite::params![
            id_str,
            rating_str,
            prof_str,
            subj_str,
            rating_comment,
            rating_date,
            reasons_str,
            comment,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(report)
  }

  async fn get_report(&self, id: Uuid) -> Result<Option<Report>> {
    self.fetch_report(id).await
  }

  async fn list_reports(&self) -> Result<Vec<Report>> {
    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REPORT_COLS} FROM reports ORDER BY reported_at DESC"
        ))?;
        let rows = stmt
          .query_map([], report_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawReport::into_report).collect()
  }

  async fn resolve_report_deleted(&self, report_id: Uuid) -> Result<Report> {
    let mut report = self
      .fetch_report(report_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::ReportNotFound(report_id)))?;

    if report.status.is_terminal() {
      return Err(Error::Core(catedra_core::Error::ReportAlreadyResolved(
        report_id,
      )));
    }

    let (rating_id, professor_id) = match (report.rating_id, report.professor_id)
    {
      (Some(r), Some(p)) => (r, p),
      _ => {
        return Err(Error::Core(catedra_core::Error::InvalidReport(report_id)));
      }
    };

    // The rating may already be gone (e.g. its professor was deleted);
    // resolving the ticket is still valid.
    self.delete_row("ratings", "rating_id", rating_id).await?;

    let id_str = encode_uuid(report_id);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE reports SET status = 'deleted' WHERE report_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    report.status = ReportStatus::Deleted;

    match self.recompute_rating_stats(professor_id).await {
      Ok(_) => {}
      // The professor may have been deleted since the report was filed.
      Err(Error::Core(catedra_core::Error::ProfessorNotFound(_))) => {}
      Err(e) => return Err(e),
    }

    Ok(report)
  }

  async fn reject_report(&self, report_id: Uuid) -> Result<Report> {
    let mut report = self
      .fetch_report(report_id)
      .await?
      .ok_or(Error::Core(catedra_core::Error::ReportNotFound(report_id)))?;

    if report.status.is_terminal() {
      return Err(Error::Core(catedra_core::Error::ReportAlreadyResolved(
        report_id,
      )));
    }

    let id_str = encode_uuid(report_id);
    let status_str = encode_status(ReportStatus::Rejected);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE reports SET status = ?1 WHERE report_id = ?2",
          rusqlite::params![status_str, id_str],
        )?;
        Ok(())
      })
      .await?;
    report.status = ReportStatus::Rejected;

    Ok(report)
  }

  // ── Activity & dashboard ──────────────────────────────────────────────────

  async fn record_activity(
    &self,
    action: ActivityAction,
    entity: EntityRef,
    changes: Option<String>,
  ) -> Result<ActivityEntry> {
    let entry = ActivityEntry {
      activity_id: Uuid::new_v4(),
      action,
      entity,
      changes,
      timestamp: Utc::now(),
    };

    let id_str = encode_uuid(entry.activity_id);
    let action_str = encode_action(action);
    let kind_str = encode_kind(entity.kind);
    let entity_str = encode_uuid(entity.id);
    let changes = entry.changes.clone();
    let at_str = encode_dt(entry.timestamp);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity_log (
             activity_id, action, entity_kind, entity_id, changes, timestamp
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            action_str,
            kind_str,
            entity_str,
            changes,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn recent_activities(&self, limit: u32) -> Result<Vec<ResolvedActivity>> {
    let limit = i64::from(limit);

    let rows: Vec<(RawActivity, Option<String>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT activity_id, action, entity_kind, entity_id, changes, timestamp
           FROM activity_log
           ORDER BY timestamp DESC
           LIMIT ?1",
        )?;
        let raws = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawActivity {
              activity_id: row.get(0)?,
              action:      row.get(1)?,
              entity_kind: row.get(2)?,
              entity_id:   row.get(3)?,
              changes:     row.get(4)?,
              timestamp:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Explicit kind → table dispatch; no reflection-style resolution.
        let mut resolved = Vec::with_capacity(raws.len());
        for raw in raws {
          let lookup = match raw.entity_kind.as_str() {
            "faculty" => "SELECT name FROM faculties WHERE faculty_id = ?1",
            "subject" => "SELECT name FROM subjects WHERE subject_id = ?1",
            "professor" => {
              "SELECT name FROM professors WHERE professor_id = ?1"
            }
            _ => {
              resolved.push((raw, None));
              continue;
            }
          };
          let name: Option<String> = conn
            .query_row(lookup, rusqlite::params![raw.entity_id], |row| {
              row.get(0)
            })
            .optional()?;
          resolved.push((raw, name));
        }
        Ok(resolved)
      })
      .await?;

    rows
      .into_iter()
      .map(|(raw, entity_name)| {
        Ok(ResolvedActivity { entry: raw.into_entry()?, entity_name })
      })
      .collect()
  }

  async fn dashboard_counts(&self) -> Result<DashboardCounts> {
    let counts: (i64, i64, i64, i64) = self
      .conn
      .call(move |conn| {
        let count = |conn: &rusqlite::Connection, sql: &str| {
          conn.query_row(sql, [], |row| row.get::<_, i64>(0))
        };
        Ok((
          count(conn, "SELECT COUNT(*) FROM faculties")?,
          count(conn, "SELECT COUNT(*) FROM subjects")?,
          count(conn, "SELECT COUNT(*) FROM professors")?,
          count(conn, "SELECT COUNT(*) FROM ratings")?,
        ))
      })
      .await?;

    Ok(DashboardCounts {
      faculties:  counts.0 as u64,
      subjects:   counts.1 as u64,
      professors: counts.2 as u64,
      ratings:    counts.3 as u64,
    })
  }
}
