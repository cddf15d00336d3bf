//! API error types and HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadence_status::StatusError;
use serde::{Deserialize, Serialize};

/// Standard JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
  /// Stable machine-readable error code.
  pub code: String,
  pub message: String,
}

/// HTTP API error with a stable machine-readable code.
#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  code: &'static str,
  message: String,
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
  }

  pub fn storage_unavailable(message: impl Into<String>) -> Self {
    Self::new(
      StatusCode::SERVICE_UNAVAILABLE,
      "STORAGE_UNAVAILABLE",
      message,
    )
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn code(&self) -> &'static str {
    self.code
  }

  fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
    Self {
      status,
      code,
      message: message.into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (
      self.status,
      Json(ApiErrorBody {
        code: self.code.to_string(),
        message: self.message,
      }),
    )
      .into_response()
  }
}

impl From<StatusError> for ApiError {
  fn from(value: StatusError) -> Self {
    match value {
      StatusError::StorageRead(e) => Self::storage_unavailable(e.to_string()),
      StatusError::InvalidIdentity(e) => Self::bad_request(e.to_string()),
      StatusError::AuthorizationDenied(denial) => {
        Self::new(
          denial_status(denial.status),
          "AUTHORIZATION_DENIED",
          denial.message,
        )
      }
    }
  }
}

/// A denial is always answered with an error status; anything else becomes 403.
fn denial_status(status: u16) -> StatusCode {
  StatusCode::from_u16(status)
    .ok()
    .filter(|s| s.is_client_error() || s.is_server_error())
    .unwrap_or(StatusCode::FORBIDDEN)
}
