//! Handlers for faculty and department endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use catedra_core::{
  activity::{ActivityAction, EntityKind, EntityRef},
  faculty::{Department, Faculty},
  store::{CatalogStore, ListFilter},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError, record_activity};

// ─── Public ──────────────────────────────────────────────────────────────────

/// One row of the home-page faculty listing.
#[derive(Debug, Serialize)]
pub struct FacultyOverview {
  #[serde(flatten)]
  pub faculty:         Faculty,
  pub subject_count:   usize,
  pub professor_count: usize,
}

/// `GET /api/faculties`
pub async fn list_home<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<FacultyOverview>>, ApiError>
where
  S: CatalogStore,
{
  let faculties = state
    .store
    .list_faculties()
    .await
    .map_err(ApiError::from_store)?;

  let mut overview = Vec::with_capacity(faculties.len());
  for faculty in faculties {
    let subjects = state
      .store
      .list_faculty_subjects(faculty.faculty_id, ListFilter::default())
      .await
      .map_err(ApiError::from_store)?;
    let professors = state
      .store
      .list_faculty_professors(faculty.faculty_id, ListFilter::default())
      .await
      .map_err(ApiError::from_store)?;
    overview.push(FacultyOverview {
      faculty,
      subject_count: subjects.len(),
      professor_count: professors.len(),
    });
  }
  Ok(Json(overview))
}

/// `GET /api/faculties/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Faculty>, ApiError>
where
  S: CatalogStore,
{
  let faculty = state
    .store
    .get_faculty(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Core(catedra_core::Error::FacultyNotFound(id)))?;
  Ok(Json(faculty))
}

/// `GET /api/faculties/:id/departments`
pub async fn list_departments<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Department>>, ApiError>
where
  S: CatalogStore,
{
  let departments = state
    .store
    .list_departments(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(departments))
}

// ─── Admin ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FacultyBody {
  pub name:         String,
  pub abbreviation: String,
}

/// `POST /api/admin/faculties`
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<FacultyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  let faculty = state
    .store
    .add_faculty(body.name, body.abbreviation)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(faculty_id = %faculty.faculty_id, "faculty created");
  record_activity(
    &state,
    ActivityAction::CreateFaculty,
    EntityRef { kind: EntityKind::Faculty, id: faculty.faculty_id },
    None,
  )
  .await;

  Ok((StatusCode::CREATED, Json(faculty)))
}

/// `PUT /api/admin/faculties/:id`
pub async fn update<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<FacultyBody>,
) -> Result<Json<Faculty>, ApiError>
where
  S: CatalogStore,
{
  let faculty = state
    .store
    .update_faculty(id, body.name, body.abbreviation)
    .await
    .map_err(ApiError::from_store)?;

  state.cache.invalidate_faculty(id);
  record_activity(
    &state,
    ActivityAction::UpdateFaculty,
    EntityRef { kind: EntityKind::Faculty, id },
    None,
  )
  .await;

  Ok(Json(faculty))
}

/// `DELETE /api/admin/faculties/:id`
pub async fn delete<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
{
  state
    .store
    .delete_faculty(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(faculty_id = %id, "faculty deleted");
  state.cache.invalidate_faculty(id);
  record_activity(
    &state,
    ActivityAction::DeleteFaculty,
    EntityRef { kind: EntityKind::Faculty, id },
    None,
  )
  .await;

  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct DepartmentBody {
  pub name: String,
}

/// `POST /api/admin/faculties/:id/departments`
pub async fn create_department<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DepartmentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  let department = state
    .store
    .add_department(id, body.name)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(department)))
}
