//! JSON error responses of the host API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::market::UnknownSide;
use crate::usecases::trading_panel::SubmitError;

/// Failure of an API request, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),
  /// The panel already has a submission in flight.
  #[error("a submission is already pending")]
  Conflict,
  #[error("{0}")]
  Unprocessable(String),
  #[error("{0}")]
  BadGateway(String),
  #[error("{0}")]
  Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrBody {
  error: String,
}

impl From<UnknownSide> for ApiError {
  fn from(e: UnknownSide) -> Self {
    Self::NotFound(e.to_string())
  }
}

impl From<SubmitError> for ApiError {
  fn from(e: SubmitError) -> Self {
    match e {
      SubmitError::InvalidStake(_) | SubmitError::Pricing(_) => Self::Unprocessable(e.to_string()),
      SubmitError::SubmissionFailed(_) => Self::BadGateway(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let code = match self {
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Conflict => StatusCode::CONFLICT,
      Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(ErrBody { error: self.to_string() })).into_response()
  }
}
