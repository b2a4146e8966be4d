//! Admin dashboard: entity counts and the recent-activity feed.

use axum::{Json, extract::State};
use catedra_core::{
  activity::{ActivityAction, DashboardCounts},
  store::CatalogStore,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

const RECENT_ACTIVITY_LIMIT: u32 = 10;

#[derive(Debug, Serialize)]
pub struct ActivityView {
  pub action:      ActivityAction,
  pub description: String,
  pub timestamp:   DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
  pub counts:            DashboardCounts,
  pub recent_activities: Vec<ActivityView>,
}

/// `GET /api/admin/dashboard`
pub async fn overview<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
) -> Result<Json<DashboardResponse>, ApiError>
where
  S: CatalogStore,
{
  let counts = state
    .store
    .dashboard_counts()
    .await
    .map_err(ApiError::from_store)?;

  let activities = state
    .store
    .recent_activities(RECENT_ACTIVITY_LIMIT)
    .await
    .map_err(ApiError::from_store)?;

  let recent_activities = activities
    .into_iter()
    .map(|resolved| {
      let name = resolved
        .entity_name
        .unwrap_or_else(|| "deleted entity".to_string());
      ActivityView {
        action:      resolved.entry.action,
        description: resolved.entry.action.describe(&name),
        timestamp:   resolved.entry.timestamp,
      }
    })
    .collect();

  Ok(Json(DashboardResponse { counts, recent_activities }))
}
