//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `catedra-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  activity::{
    ActivityAction, ActivityEntry, DashboardCounts, EntityRef,
    ResolvedActivity,
  },
  faculty::{Department, Faculty},
  professor::{
    NewProfessor, Professor, ProfessorDetails, ProfessorOutcome,
    ProfessorUpdate, RatingStats,
  },
  rating::{NewRating, Rating},
  report::{NewReport, Report},
  subject::{NewSubject, Subject, SubjectUpdate},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filter for faculty-scoped subject/professor listings.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
  /// Substring match; folded for subjects, case-insensitive for professors.
  pub search: Option<String>,
  pub limit:  Option<u32>,
}

/// A page of a global listing.
#[derive(Debug, Clone)]
pub struct Paged<T> {
  pub items:       Vec<T>,
  pub total:       u64,
  pub page:        u32,
  pub total_pages: u32,
}

impl<T> Paged<T> {
  pub fn has_next_page(&self) -> bool { self.page < self.total_pages }

  pub fn has_prev_page(&self) -> bool { self.page > 1 }
}

/// A page of a professor's ratings, newest first.
#[derive(Debug, Clone)]
pub struct RatingPage {
  pub ratings:   Vec<Rating>,
  /// The next page number, if more ratings remain.
  pub next_page: Option<u32>,
  pub total:     u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Catedra catalog backend.
///
/// The professor↔subject link invariant (`p ∈ s.professor_ids ⟺
/// s ∈ p.subject_ids`) must hold after every method returns, including the
/// best-effort delete cleanups.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: Into<crate::Error> + std::error::Error + Send + Sync + 'static;

  // ── Faculties ─────────────────────────────────────────────────────────

  fn add_faculty(
    &self,
    name: String,
    abbreviation: String,
  ) -> impl Future<Output = Result<Faculty, Self::Error>> + Send + '_;

  /// Retrieve a faculty by id. Returns `None` if not found.
  fn get_faculty(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Faculty>, Self::Error>> + Send + '_;

  fn list_faculties(
    &self,
  ) -> impl Future<Output = Result<Vec<Faculty>, Self::Error>> + Send + '_;

  fn update_faculty(
    &self,
    id: Uuid,
    name: String,
    abbreviation: String,
  ) -> impl Future<Output = Result<Faculty, Self::Error>> + Send + '_;

  /// Delete a faculty and cascade to its departments, subjects, professors,
  /// and ratings. Cleanup steps are best-effort: a failing step is recorded
  /// and the rest are still attempted.
  fn delete_faculty(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn add_department(
    &self,
    faculty_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Department, Self::Error>> + Send + '_;

  fn list_departments(
    &self,
    faculty_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Department>, Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Create a subject. Fails with `DuplicateSubject` if another subject in
  /// the same faculty has the same folded name — subjects are never
  /// silently merged.
  fn add_subject(
    &self,
    input: NewSubject,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn get_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// Subjects of one faculty, filtered by folded substring search.
  fn list_faculty_subjects(
    &self,
    faculty_id: Uuid,
    filter: ListFilter,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Global paginated subject listing for the admin overview.
  fn list_subjects(
    &self,
    page: u32,
    per_page: u32,
    search: Option<String>,
  ) -> impl Future<Output = Result<Paged<Subject>, Self::Error>> + Send + '_;

  fn update_subject(
    &self,
    id: Uuid,
    update: SubjectUpdate,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  /// Delete a subject: pulls it from every linked professor and deletes its
  /// ratings. Best-effort cleanup semantics as for `delete_faculty`.
  fn delete_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The professors linked to a subject.
  fn subject_professors(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Professor>, Self::Error>> + Send + '_;

  // ── Professors ────────────────────────────────────────────────────────

  /// Create a professor, or silently merge into an existing one whose
  /// folded name matches within the faculty (the requested subjects are
  /// attached either way). Fails with `SubjectNotFound` if any requested
  /// subject is missing.
  fn create_professor(
    &self,
    input: NewProfessor,
  ) -> impl Future<Output = Result<ProfessorOutcome, Self::Error>> + Send + '_;

  fn get_professor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Professor>, Self::Error>> + Send + '_;

  /// Professors of one faculty, filtered by case-insensitive substring
  /// search on the stored name.
  fn list_faculty_professors(
    &self,
    faculty_id: Uuid,
    filter: ListFilter,
  ) -> impl Future<Output = Result<Vec<Professor>, Self::Error>> + Send + '_;

  /// All professors with faculty and subject names resolved.
  fn list_professor_details(
    &self,
  ) -> impl Future<Output = Result<Vec<ProfessorDetails>, Self::Error>> + Send + '_;

  /// Update a professor. A rename checks for an exact-name duplicate in the
  /// faculty; a new subject list is reconciled on both sides of the link by
  /// set difference against the previous list.
  fn update_professor(
    &self,
    id: Uuid,
    update: ProfessorUpdate,
  ) -> impl Future<Output = Result<Professor, Self::Error>> + Send + '_;

  /// Delete a professor, its ratings, and its entry in every linked
  /// subject. Best-effort cleanup semantics.
  fn delete_professor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Idempotently link a professor and a subject in both directions.
  fn attach(
    &self,
    professor_id: Uuid,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Recompute and persist a professor's denormalized rating statistics
  /// from a full scan of its ratings.
  fn recompute_rating_stats(
    &self,
    professor_id: Uuid,
  ) -> impl Future<Output = Result<RatingStats, Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  /// Create a rating. Attaches the professor/subject pair if not yet
  /// linked, then recomputes the professor's statistics.
  fn add_rating(
    &self,
    input: NewRating,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  fn get_rating(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Rating>, Self::Error>> + Send + '_;

  /// A professor's ratings, newest first.
  fn list_professor_ratings(
    &self,
    professor_id: Uuid,
    page: u32,
    per_page: u32,
  ) -> impl Future<Output = Result<RatingPage, Self::Error>> + Send + '_;

  /// Toggle a helpful vote: removes `voter_id` if present, otherwise adds
  /// it to `likes` and removes it from the legacy `dislikes` set. Never
  /// touches rating statistics.
  fn toggle_like(
    &self,
    rating_id: Uuid,
    voter_id: String,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// File a moderation report against a rating, snapshotting its content.
  fn create_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  fn get_report(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  fn list_reports(
    &self,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + '_;

  /// Resolve a pending report by deleting the reported rating, marking the
  /// report `deleted`, and recomputing the professor's statistics. This is
  /// the only moderation path that removes a rating.
  fn resolve_report_deleted(
    &self,
    report_id: Uuid,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Reject a pending report. No side effects on the rating or statistics.
  fn reject_report(
    &self,
    report_id: Uuid,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  // ── Activity & dashboard ──────────────────────────────────────────────

  /// Append an activity entry. The timestamp is set by the store.
  fn record_activity(
    &self,
    action: ActivityAction,
    entity: EntityRef,
    changes: Option<String>,
  ) -> impl Future<Output = Result<ActivityEntry, Self::Error>> + Send + '_;

  /// The most recent activity entries with entity names resolved.
  fn recent_activities(
    &self,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<ResolvedActivity>, Self::Error>> + Send + '_;

  fn dashboard_counts(
    &self,
  ) -> impl Future<Output = Result<DashboardCounts, Self::Error>> + Send + '_;
}
