//! Handlers for rating listing, submission, and vote toggling.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use catedra_core::{
  rating::{NewRating, Rating, Scores},
  store::{CatalogStore, RatingPage},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PageParams {
  pub page:     Option<u32>,
  pub per_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RatingsResponse {
  pub ratings:   Vec<Rating>,
  pub next_page: Option<u32>,
  pub total:     u64,
}

impl From<RatingPage> for RatingsResponse {
  fn from(page: RatingPage) -> Self {
    Self {
      ratings:   page.ratings,
      next_page: page.next_page,
      total:     page.total,
    }
  }
}

/// `GET /api/professors/:id/ratings[?page=&per_page=]`
pub async fn list_for_professor<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<PageParams>,
) -> Result<Json<RatingsResponse>, ApiError>
where
  S: CatalogStore,
{
  let page = state
    .store
    .list_professor_ratings(
      id,
      params.page.unwrap_or(1),
      params.per_page.unwrap_or(10),
    )
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page.into()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub subject_id:    Uuid,
  #[serde(flatten)]
  pub scores:        Scores,
  pub would_retake:  bool,
  pub comment:       String,
  pub captcha_token: Option<String>,
}

/// `POST /api/professors/:id/ratings`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(professor_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  state
    .captcha
    .verify(body.captcha_token.as_deref())
    .await?;

  let rating = state
    .store
    .add_rating(NewRating {
      professor_id,
      subject_id: body.subject_id,
      scores: body.scores,
      would_retake: body.would_retake,
      comment: body.comment,
    })
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(rating_id = %rating.rating_id, "rating submitted");

  // The professor listing carries the aggregate snapshot, which just moved.
  if let Some(professor) = state
    .store
    .get_professor(professor_id)
    .await
    .map_err(ApiError::from_store)?
  {
    state.cache.invalidate_faculty(professor.faculty_id);
  }

  Ok((StatusCode::CREATED, Json(rating)))
}

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub voter_id:      String,
  pub captcha_token: Option<String>,
}

/// `POST /api/ratings/:id/vote`
pub async fn vote<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<VoteBody>,
) -> Result<Json<Rating>, ApiError>
where
  S: CatalogStore,
{
  state
    .captcha
    .verify(body.captcha_token.as_deref())
    .await?;

  if body.voter_id.is_empty() {
    return Err(ApiError::BadRequest("voter_id must not be empty".into()));
  }

  let rating = state
    .store
    .toggle_like(id, body.voter_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rating))
}
