//! JSON REST API for Catedra.
//!
//! Exposes an axum [`Router`] backed by any
//! [`catedra_core::store::CatalogStore`]: a public router for browsing and
//! submissions, and a Basic-auth admin router for catalog management and
//! moderation. TLS and transport concerns are the caller's responsibility.

pub mod auth;
pub mod cache;
pub mod captcha;
pub mod dashboard;
pub mod error;
pub mod faculties;
pub mod professors;
pub mod ratings;
pub mod reports;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use catedra_core::{
  activity::{ActivityAction, EntityRef},
  store::CatalogStore,
};

pub use auth::AuthConfig;
pub use cache::ListingCache;
pub use captcha::CaptchaVerifier;
pub use error::ApiError;

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub auth:    Arc<AuthConfig>,
  pub captcha: Arc<CaptchaVerifier>,
  pub cache:   Arc<ListingCache>,
}

/// Append an activity entry after a successful admin mutation. A failure to
/// log never fails the request that triggered it.
pub(crate) async fn record_activity<S: CatalogStore>(
  state: &AppState<S>,
  action: ActivityAction,
  entity: EntityRef,
  changes: Option<String>,
) {
  if let Err(e) = state.store.record_activity(action, entity, changes).await {
    tracing::warn!(error = %e, "failed to record activity entry");
  }
}

/// Build the full application router: public endpoints under `/api`, admin
/// endpoints under `/api/admin`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", public_router())
    .nest("/api/admin", admin_router())
    .layer(tower_http::trace::TraceLayer::new_for_http())
    .with_state(state)
}

fn public_router<S>() -> Router<AppState<S>>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/faculties", get(faculties::list_home::<S>))
    .route("/faculties/{id}", get(faculties::get_one::<S>))
    .route(
      "/faculties/{id}/departments",
      get(faculties::list_departments::<S>),
    )
    .route(
      "/faculties/{id}/subjects",
      get(subjects::list_for_faculty::<S>),
    )
    .route(
      "/faculties/{id}/professors",
      get(professors::list_for_faculty::<S>)
        .post(professors::create::<S>),
    )
    .route("/subjects/{id}", get(subjects::get_one::<S>))
    .route("/subjects/{id}/professors", get(subjects::professors_of::<S>))
    .route("/professors/{id}", get(professors::get_one::<S>))
    .route(
      "/professors/{id}/ratings",
      get(ratings::list_for_professor::<S>).post(ratings::create::<S>),
    )
    .route("/ratings/{id}/vote", post(ratings::vote::<S>))
    .route("/ratings/{id}/report", post(reports::create::<S>))
}

fn admin_router<S>() -> Router<AppState<S>>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/dashboard", get(dashboard::overview::<S>))
    .route("/faculties", post(faculties::create::<S>))
    .route(
      "/faculties/{id}",
      put(faculties::update::<S>).delete(faculties::delete::<S>),
    )
    .route(
      "/faculties/{id}/departments",
      post(faculties::create_department::<S>),
    )
    .route("/faculties/{id}/subjects", post(subjects::create::<S>))
    .route("/subjects", get(subjects::list_global::<S>))
    .route(
      "/subjects/{id}",
      put(subjects::update::<S>).delete(subjects::delete::<S>),
    )
    .route("/professors", get(professors::list_details::<S>))
    .route(
      "/professors/{id}",
      put(professors::update::<S>).delete(professors::delete::<S>),
    )
    .route("/reports", get(reports::list::<S>))
    .route("/reports/{id}", get(reports::get_one::<S>))
    .route("/reports/{id}/delete", put(reports::resolve_deleted::<S>))
    .route("/reports/{id}/reject", put(reports::reject::<S>))
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use catedra_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state(captcha: CaptchaVerifier) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();

    AppState {
      store:   Arc::new(store),
      auth:    Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
      captcha: Arc::new(captcha),
      cache:   Arc::new(ListingCache::new(true)),
    }
  }

  fn admin_auth() -> String {
    format!("Basic {}", B64.encode("admin:secret"))
  }

  async fn request(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    authed: bool,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if authed {
      builder = builder.header(header::AUTHORIZATION, admin_auth());
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create_faculty(state: &AppState<SqliteStore>) -> String {
    let resp = request(
      state.clone(),
      "POST",
      "/api/admin/faculties",
      true,
      Some(json!({ "name": "Ingeniería", "abbreviation": "FI" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["faculty_id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  async fn create_subject(
    state: &AppState<SqliteStore>,
    faculty_id: &str,
    name: &str,
  ) -> String {
    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/admin/faculties/{faculty_id}/subjects"),
      true,
      Some(json!({ "name": name, "credits": 6 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["subject_id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  async fn create_professor(
    state: &AppState<SqliteStore>,
    faculty_id: &str,
    name: &str,
    subject_id: &str,
  ) -> String {
    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      Some(json!({ "name": name, "subject_ids": [subject_id] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await["professor_id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  async fn submit_rating(
    state: &AppState<SqliteStore>,
    professor_id: &str,
    subject_id: &str,
    general: f64,
  ) -> String {
    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/professors/{professor_id}/ratings"),
      false,
      Some(json!({
        "subject_id": subject_id,
        "general": general,
        "explanation": 4.0,
        "accessibility": 4.0,
        "difficulty": 3.0,
        "attendance": 5.0,
        "would_retake": true,
        "comment": "great course",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["rating_id"]
      .as_str()
      .unwrap()
      .to_string()
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_routes_require_auth() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let resp =
      request(state, "GET", "/api/admin/dashboard", false, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_rejected() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let auth = format!("Basic {}", B64.encode("admin:wrong"));
    let req = Request::builder()
      .method("GET")
      .uri("/api/admin/dashboard")
      .header(header::AUTHORIZATION, auth)
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Faculties ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn faculty_crud_and_home_listing() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    create_subject(&state, &faculty_id, "Redes").await;

    let resp = request(state.clone(), "GET", "/api/faculties", false, None)
      .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing = json_body(resp).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["name"], "Ingeniería");
    assert_eq!(listing[0]["subject_count"], 1);
    assert_eq!(listing[0]["professor_count"], 0);

    let resp = request(
      state.clone(),
      "PUT",
      &format!("/api/admin/faculties/{faculty_id}"),
      true,
      Some(json!({ "name": "Ingeniería y Ciencias", "abbreviation": "FIC" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["abbreviation"], "FIC");

    let resp = request(
      state.clone(),
      "DELETE",
      &format!("/api/admin/faculties/{faculty_id}"),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = request(
      state,
      "GET",
      &format!("/api/faculties/{faculty_id}"),
      false,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn duplicate_subject_returns_400() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    create_subject(&state, &faculty_id, "Cálculo I").await;

    let resp = request(
      state,
      "POST",
      &format!("/api/admin/faculties/{faculty_id}/subjects"),
      true,
      Some(json!({ "name": "calculo i", "credits": 6 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn subject_update_distinguishes_null_from_absent() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;

    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/admin/faculties/{faculty_id}/subjects"),
      true,
      Some(json!({
        "name": "Redes",
        "credits": 6,
        "description": "introductory networking",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let subject_id = json_body(resp).await["subject_id"]
      .as_str()
      .unwrap()
      .to_string();

    // An absent field keeps the stored value.
    let resp = request(
      state.clone(),
      "PUT",
      &format!("/api/admin/subjects/{subject_id}"),
      true,
      Some(json!({ "credits": 8 })),
    )
    .await;
    let body = json_body(resp).await;
    assert_eq!(body["credits"], 8);
    assert_eq!(body["description"], "introductory networking");

    // An explicit null clears it.
    let resp = request(
      state,
      "PUT",
      &format!("/api/admin/subjects/{subject_id}"),
      true,
      Some(json!({ "description": null })),
    )
    .await;
    let body = json_body(resp).await;
    assert!(body["description"].is_null());
  }

  #[tokio::test]
  async fn subject_listing_is_cached_until_invalidated() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    create_subject(&state, &faculty_id, "Redes").await;

    // Prime the cache.
    let resp = request(
      state.clone(),
      "GET",
      &format!("/api/faculties/{faculty_id}/subjects"),
      false,
      None,
    )
    .await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);

    // A write through the admin router must invalidate it.
    create_subject(&state, &faculty_id, "Compiladores").await;
    let resp = request(
      state,
      "GET",
      &format!("/api/faculties/{faculty_id}/subjects"),
      false,
      None,
    )
    .await;
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);
  }

  // ── Professors ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn professor_create_answers_json_merge_answers_201() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let math = create_subject(&state, &faculty_id, "Matemáticas").await;
    let physics = create_subject(&state, &faculty_id, "Física").await;

    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      Some(json!({ "name": "José Pérez", "subject_ids": [math] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created = json_body(resp).await;
    assert_eq!(created["name"], "José Pérez");
    let professor_id = created["professor_id"].as_str().unwrap().to_string();

    // Same folded name: merged, confirmed with a plain 201 text body.
    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      Some(json!({ "name": "jose perez", "subject_ids": [physics] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = request(
      state,
      "GET",
      &format!("/api/professors/{professor_id}"),
      false,
      None,
    )
    .await;
    let merged = json_body(resp).await;
    assert_eq!(merged["name"], "José Pérez");
    assert_eq!(merged["subject_ids"].as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn get_missing_professor_returns_404() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let resp = request(
      state,
      "GET",
      &format!("/api/professors/{}", uuid::Uuid::new_v4()),
      false,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn rating_updates_visible_professor_stats() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;
    let professor_id =
      create_professor(&state, &faculty_id, "Laura Gómez", &subject_id).await;

    // Prime the professor listing cache, then submit a rating.
    request(
      state.clone(),
      "GET",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      None,
    )
    .await;
    submit_rating(&state, &professor_id, &subject_id, 5.0).await;
    submit_rating(&state, &professor_id, &subject_id, 3.0).await;

    let resp = request(
      state,
      "GET",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      None,
    )
    .await;
    let listing = json_body(resp).await;
    let stats = &listing[0]["rating_stats"];
    assert_eq!(stats["total_ratings"], 2);
    assert_eq!(stats["average_general"], 4.0);
  }

  #[tokio::test]
  async fn invalid_score_returns_400() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;
    let professor_id =
      create_professor(&state, &faculty_id, "Laura Gómez", &subject_id).await;

    let resp = request(
      state,
      "POST",
      &format!("/api/professors/{professor_id}/ratings"),
      false,
      Some(json!({
        "subject_id": subject_id,
        "general": 6.0,
        "explanation": 4.0,
        "accessibility": 4.0,
        "difficulty": 3.0,
        "attendance": 5.0,
        "would_retake": true,
        "comment": "x",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn vote_toggles() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;
    let professor_id =
      create_professor(&state, &faculty_id, "Laura Gómez", &subject_id).await;
    let rating_id =
      submit_rating(&state, &professor_id, &subject_id, 4.0).await;

    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/ratings/{rating_id}/vote"),
      false,
      Some(json!({ "voter_id": "anon-1" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["likes"], json!(["anon-1"]));

    let resp = request(
      state,
      "POST",
      &format!("/api/ratings/{rating_id}/vote"),
      false,
      Some(json!({ "voter_id": "anon-1" })),
    )
    .await;
    assert_eq!(json_body(resp).await["likes"], json!([]));
  }

  // ── Captcha ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_captcha_token_fails_closed() {
    // Recaptcha mode with no token must reject before any network call.
    let state =
      make_state(CaptchaVerifier::recaptcha("test-secret".into())).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;

    let resp = request(
      state,
      "POST",
      &format!("/api/faculties/{faculty_id}/professors"),
      false,
      Some(json!({ "name": "Laura Gómez", "subject_ids": [subject_id] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Moderation ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn report_resolve_deletes_rating() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;
    let professor_id =
      create_professor(&state, &faculty_id, "Laura Gómez", &subject_id).await;
    let rating_id =
      submit_rating(&state, &professor_id, &subject_id, 4.0).await;

    let resp = request(
      state.clone(),
      "POST",
      &format!("/api/ratings/{rating_id}/report"),
      false,
      Some(json!({ "reasons": ["spam"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let report_id = json_body(resp).await["report_id"]
      .as_str()
      .unwrap()
      .to_string();

    let resp = request(
      state.clone(),
      "PUT",
      &format!("/api/admin/reports/{report_id}/delete"),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "deleted");

    // The rating is gone and the stats are back at the zero-state.
    let resp = request(
      state.clone(),
      "GET",
      &format!("/api/professors/{professor_id}/ratings"),
      false,
      None,
    )
    .await;
    assert_eq!(json_body(resp).await["total"], 0);

    // Resolving again hits the terminal-state guard.
    let resp = request(
      state,
      "PUT",
      &format!("/api/admin/reports/{report_id}/delete"),
      true,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn report_without_reasons_rejected() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    let subject_id = create_subject(&state, &faculty_id, "Redes").await;
    let professor_id =
      create_professor(&state, &faculty_id, "Laura Gómez", &subject_id).await;
    let rating_id =
      submit_rating(&state, &professor_id, &subject_id, 4.0).await;

    let resp = request(
      state,
      "POST",
      &format!("/api/ratings/{rating_id}/report"),
      false,
      Some(json!({ "reasons": [] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_reports_counts_and_activities() {
    let state = make_state(CaptchaVerifier::disabled()).await;
    let faculty_id = create_faculty(&state).await;
    create_subject(&state, &faculty_id, "Redes").await;

    let resp =
      request(state, "GET", "/api/admin/dashboard", true, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["counts"]["faculties"], 1);
    assert_eq!(body["counts"]["subjects"], 1);

    let feed = body["recent_activities"].as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert!(
      feed
        .iter()
        .any(|a| a["description"].as_str().unwrap().contains("Redes"))
    );
  }
}
