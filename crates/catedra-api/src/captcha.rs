//! CAPTCHA verification for public write endpoints.
//!
//! Verification fails closed: a missing token, a siteverify transport
//! failure, or a negative verdict all reject the submission.

use serde::Deserialize;

use crate::error::ApiError;

const SITEVERIFY_URL: &str =
  "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
  success: bool,
}

/// Gatekeeper for rating, vote, and report submissions.
#[derive(Clone)]
pub enum CaptchaVerifier {
  /// Accepts everything; for tests and local development.
  Disabled,
  /// Verifies tokens against the reCAPTCHA siteverify endpoint.
  Recaptcha {
    client: reqwest::Client,
    secret: String,
  },
}

impl CaptchaVerifier {
  pub fn disabled() -> Self { Self::Disabled }

  pub fn recaptcha(secret: String) -> Self {
    Self::Recaptcha { client: reqwest::Client::new(), secret }
  }

  pub async fn verify(&self, token: Option<&str>) -> Result<(), ApiError> {
    let (client, secret) = match self {
      Self::Disabled => return Ok(()),
      Self::Recaptcha { client, secret } => (client, secret),
    };

    let token = token.ok_or(ApiError::CaptchaRejected)?;

    let response = client
      .post(SITEVERIFY_URL)
      .form(&[("secret", secret.as_str()), ("response", token)])
      .send()
      .await
      .map_err(|e| {
        tracing::warn!(error = %e, "captcha siteverify request failed");
        ApiError::CaptchaRejected
      })?;

    let verdict: SiteverifyResponse = response.json().await.map_err(|e| {
      tracing::warn!(error = %e, "captcha siteverify response unreadable");
      ApiError::CaptchaRejected
    })?;

    if verdict.success {
      Ok(())
    } else {
      Err(ApiError::CaptchaRejected)
    }
  }
}
