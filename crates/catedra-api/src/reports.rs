//! Handlers for the moderation-report workflow.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use catedra_core::{
  report::{NewReport, Report},
  store::CatalogStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Public ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub reasons:       Vec<String>,
  pub comment:       Option<String>,
  pub captcha_token: Option<String>,
}

/// `POST /api/ratings/:id/report`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(rating_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  state
    .captcha
    .verify(body.captcha_token.as_deref())
    .await?;

  if body.reasons.is_empty() {
    return Err(ApiError::BadRequest(
      "at least one reason is required".into(),
    ));
  }

  let report = state
    .store
    .create_report(NewReport {
      rating_id,
      reasons: body.reasons,
      comment: body.comment,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(report_id = %report.report_id, "report filed");
  Ok((StatusCode::CREATED, Json(report)))
}

// ─── Admin ───────────────────────────────────────────────────────────────────

/// `GET /api/admin/reports`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Report>>, ApiError>
where
  S: CatalogStore,
{
  let reports = state
    .store
    .list_reports()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(reports))
}

/// `GET /api/admin/reports/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError>
where
  S: CatalogStore,
{
  let report = state
    .store
    .get_report(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or(ApiError::Core(catedra_core::Error::ReportNotFound(id)))?;
  Ok(Json(report))
}

/// `PUT /api/admin/reports/:id/delete` — delete the reported rating and
/// close the ticket.
pub async fn resolve_deleted<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError>
where
  S: CatalogStore,
{
  let report = state
    .store
    .resolve_report_deleted(id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(report_id = %id, "report resolved, rating deleted");
  // The deletion moved a professor's statistics; the professor reference on
  // the ticket may be stale, so flush wholesale.
  state.cache.invalidate_all();

  Ok(Json(report))
}

/// `PUT /api/admin/reports/:id/reject`
pub async fn reject<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError>
where
  S: CatalogStore,
{
  let report = state
    .store
    .reject_report(id)
    .await
    .map_err(ApiError::from_store)?;
  tracing::info!(report_id = %id, "report rejected");
  Ok(Json(report))
}
