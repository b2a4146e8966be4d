//! Handlers for subject endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use catedra_core::{
  activity::{ActivityAction, EntityKind, EntityRef},
  professor::Professor,
  store::{CatalogStore, ListFilter, Paged},
  subject::{NewSubject, Subject, SubjectUpdate},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError, record_activity};

// ─── Public ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
  pub limit:  Option<u32>,
}

/// `GET /api/faculties/:id/subjects[?search=&limit=]`
///
/// Unfiltered listings are served from the TTL cache.
pub async fn list_for_faculty<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: CatalogStore,
{
  let unfiltered = params.search.is_none() && params.limit.is_none();
  if unfiltered
    && let Some(cached) = state.cache.get_subjects(id)
  {
    return Ok(Json(cached));
  }

  let subjects = state
    .store
    .list_faculty_subjects(id, ListFilter {
      search: params.search,
      limit:  params.limit,
    })
    .await
    .map_err(ApiError::from_store)?;

  if unfiltered {
    state.cache.put_subjects(id, subjects.clone());
  }
  Ok(Json(subjects))
}

/// `GET /api/subjects/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Subject>, ApiError>
where
  S: CatalogStore,
{
  let subject = state
    .store
    .get_subject(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Core(catedra_core::Error::SubjectNotFound(id)))?;
  Ok(Json(subject))
}

/// `GET /api/subjects/:id/professors`
pub async fn professors_of<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Professor>>, ApiError>
where
  S: CatalogStore,
{
  let professors = state
    .store
    .subject_professors(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(professors))
}

// ─── Admin ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PageParams {
  pub page:     Option<u32>,
  pub per_page: Option<u32>,
  pub search:   Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PagedSubjects {
  pub subjects:      Vec<Subject>,
  pub total:         u64,
  pub page:          u32,
  pub total_pages:   u32,
  pub has_next_page: bool,
  pub has_prev_page: bool,
}

impl From<Paged<Subject>> for PagedSubjects {
  fn from(paged: Paged<Subject>) -> Self {
    Self {
      has_next_page: paged.has_next_page(),
      has_prev_page: paged.has_prev_page(),
      subjects:      paged.items,
      total:         paged.total,
      page:          paged.page,
      total_pages:   paged.total_pages,
    }
  }
}

/// `GET /api/admin/subjects[?page=&per_page=&search=]`
pub async fn list_global<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Json<PagedSubjects>, ApiError>
where
  S: CatalogStore,
{
  let paged = state
    .store
    .list_subjects(
      params.page.unwrap_or(1),
      params.per_page.unwrap_or(20),
      params.search,
    )
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(paged.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:          String,
  pub credits:       u32,
  pub description:   Option<String>,
  pub department_id: Option<Uuid>,
}

/// `POST /api/admin/faculties/:id/subjects`
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(faculty_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  let subject = state
    .store
    .add_subject(NewSubject {
      faculty_id,
      department_id: body.department_id,
      name: body.name,
      credits: body.credits,
      description: body.description,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(subject_id = %subject.subject_id, "subject created");
  state.cache.invalidate_faculty(faculty_id);
  record_activity(
    &state,
    ActivityAction::CreateSubject,
    EntityRef { kind: EntityKind::Subject, id: subject.subject_id },
    None,
  )
  .await;

  Ok((StatusCode::CREATED, Json(subject)))
}

/// Distinguishes an absent field (keep) from an explicit `null` (clear).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  T: serde::Deserialize<'de>,
  D: serde::Deserializer<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:          Option<String>,
  pub credits:       Option<u32>,
  #[serde(default, deserialize_with = "double_option")]
  pub description:   Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub department_id: Option<Option<Uuid>>,
}

/// `PUT /api/admin/subjects/:id`
pub async fn update<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Subject>, ApiError>
where
  S: CatalogStore,
{
  let subject = state
    .store
    .update_subject(id, SubjectUpdate {
      name:          body.name,
      credits:       body.credits,
      description:   body.description,
      department_id: body.department_id,
    })
    .await
    .map_err(ApiError::from_store)?;

  state.cache.invalidate_faculty(subject.faculty_id);
  record_activity(
    &state,
    ActivityAction::UpdateSubject,
    EntityRef { kind: EntityKind::Subject, id },
    None,
  )
  .await;

  Ok(Json(subject))
}

/// `DELETE /api/admin/subjects/:id`
pub async fn delete<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
{
  // Resolve the owning faculty before the row disappears.
  let faculty_id = state
    .store
    .get_subject(id)
    .await
    .map_err(ApiError::from_store)?
    .map(|s| s.faculty_id);

  state
    .store
    .delete_subject(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(subject_id = %id, "subject deleted");
  if let Some(faculty_id) = faculty_id {
    state.cache.invalidate_faculty(faculty_id);
  }
  record_activity(
    &state,
    ActivityAction::DeleteSubject,
    EntityRef { kind: EntityKind::Subject, id },
    None,
  )
  .await;

  Ok(StatusCode::NO_CONTENT)
}
