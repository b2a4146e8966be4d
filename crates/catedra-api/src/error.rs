//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] catedra_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("captcha verification failed")]
  CaptchaRejected,

  #[error("unauthorized")]
  Unauthorized,
}

impl ApiError {
  /// Lift any store error into the API error space via the core taxonomy.
  pub fn from_store<E: Into<catedra_core::Error>>(e: E) -> Self {
    Self::Core(e.into())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use catedra_core::Error as Core;

    let (status, message) = match &self {
      ApiError::Core(core) => match core {
        Core::FacultyNotFound(_)
        | Core::SubjectNotFound(_)
        | Core::ProfessorNotFound(_)
        | Core::RatingNotFound(_)
        | Core::ReportNotFound(_) => (StatusCode::NOT_FOUND, core.to_string()),

        Core::DuplicateSubject(_)
        | Core::DuplicateProfessor(_)
        | Core::InvalidDepartment(_)
        | Core::InvalidReport(_)
        | Core::ReportAlreadyResolved(_)
        | Core::InvalidScore(_) => (StatusCode::BAD_REQUEST, core.to_string()),

        Core::PartialCleanup { failed } => {
          tracing::error!(?failed, "cleanup partially failed");
          (
            StatusCode::INTERNAL_SERVER_ERROR,
            "cleanup partially failed".to_string(),
          )
        }

        // Storage details stay server-side.
        other => {
          tracing::error!(error = %other, "internal error");
          (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
          )
        }
      },
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::CaptchaRejected => {
        (StatusCode::BAD_REQUEST, self.to_string())
      }
      ApiError::Unauthorized => {
        return (
          StatusCode::UNAUTHORIZED,
          [(header::WWW_AUTHENTICATE, "Basic realm=\"catedra-admin\"")],
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
      }
    };

    (status, Json(json!({ "error": message }))).into_response()
  }
}
