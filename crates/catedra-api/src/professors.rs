//! Handlers for professor endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use catedra_core::{
  activity::{ActivityAction, EntityKind, EntityRef},
  professor::{
    NewProfessor, Professor, ProfessorDetails, ProfessorOutcome,
    ProfessorUpdate,
  },
  store::{CatalogStore, ListFilter},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState, auth::Authenticated, error::ApiError, record_activity,
  subjects::ListParams,
};

// ─── Public ──────────────────────────────────────────────────────────────────

/// `GET /api/faculties/:id/professors[?search=&limit=]`
pub async fn list_for_faculty<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Professor>>, ApiError>
where
  S: CatalogStore,
{
  let unfiltered = params.search.is_none() && params.limit.is_none();
  if unfiltered
    && let Some(cached) = state.cache.get_professors(id)
  {
    return Ok(Json(cached));
  }

  let professors = state
    .store
    .list_faculty_professors(id, ListFilter {
      search: params.search,
      limit:  params.limit,
    })
    .await
    .map_err(ApiError::from_store)?;

  if unfiltered {
    state.cache.put_professors(id, professors.clone());
  }
  Ok(Json(professors))
}

/// `GET /api/professors/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Professor>, ApiError>
where
  S: CatalogStore,
{
  let professor = state
    .store
    .get_professor(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Core(catedra_core::Error::ProfessorNotFound(id)))?;
  Ok(Json(professor))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:          String,
  pub department:    Option<String>,
  #[serde(default)]
  pub subject_ids:   Vec<Uuid>,
  pub captcha_token: Option<String>,
}

/// `POST /api/faculties/:id/professors`
///
/// A folded-name match within the faculty silently merges into the existing
/// record and answers 201 with a confirmation text; a fresh create answers
/// 200 with the new professor.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(faculty_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<Response, ApiError>
where
  S: CatalogStore,
{
  state
    .captcha
    .verify(body.captcha_token.as_deref())
    .await?;

  let outcome = state
    .store
    .create_professor(NewProfessor {
      faculty_id,
      name: body.name,
      department: body.department,
      subject_ids: body.subject_ids,
    })
    .await
    .map_err(ApiError::from_store)?;

  state.cache.invalidate_faculty(faculty_id);

  match outcome {
    ProfessorOutcome::Created(professor) => {
      tracing::info!(professor_id = %professor.professor_id, "professor created");
      record_activity(
        &state,
        ActivityAction::CreateProfessor,
        EntityRef {
          kind: EntityKind::Professor,
          id:   professor.professor_id,
        },
        None,
      )
      .await;
      Ok((StatusCode::OK, Json(professor)).into_response())
    }
    ProfessorOutcome::Merged(professor) => {
      tracing::info!(professor_id = %professor.professor_id, "professor merged");
      Ok((StatusCode::CREATED, "professor updated with new subjects")
        .into_response())
    }
  }
}

// ─── Admin ───────────────────────────────────────────────────────────────────

/// `GET /api/admin/professors`
pub async fn list_details<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProfessorDetails>>, ApiError>
where
  S: CatalogStore,
{
  let details = state
    .store
    .list_professor_details()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(details))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:        Option<String>,
  /// An empty string clears the department label.
  pub department:  Option<String>,
  pub subject_ids: Option<Vec<Uuid>>,
}

/// `PUT /api/admin/professors/:id`
pub async fn update<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Professor>, ApiError>
where
  S: CatalogStore,
{
  let professor = state
    .store
    .update_professor(id, ProfessorUpdate {
      name:        body.name,
      department:  body.department.map(Some),
      subject_ids: body.subject_ids,
    })
    .await
    .map_err(ApiError::from_store)?;

  state.cache.invalidate_faculty(professor.faculty_id);
  record_activity(
    &state,
    ActivityAction::UpdateProfessor,
    EntityRef { kind: EntityKind::Professor, id },
    None,
  )
  .await;

  Ok(Json(professor))
}

/// `DELETE /api/admin/professors/:id`
pub async fn delete<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
{
  let faculty_id = state
    .store
    .get_professor(id)
    .await
    .map_err(ApiError::from_store)?
    .map(|p| p.faculty_id);

  state
    .store
    .delete_professor(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(professor_id = %id, "professor deleted");
  if let Some(faculty_id) = faculty_id {
    state.cache.invalidate_faculty(faculty_id);
  }
  record_activity(
    &state,
    ActivityAction::DeleteProfessor,
    EntityRef { kind: EntityKind::Professor, id },
    None,
  )
  .await;

  Ok(StatusCode::NO_CONTENT)
}
