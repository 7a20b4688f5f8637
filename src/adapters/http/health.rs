//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;

/// Always 200 while the process is running.
pub async fn liveness() -> impl IntoResponse {
  (StatusCode::OK, "OK")
}

/// 200 until shutdown begins, then 503.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
  if *state.ready.borrow() {
    (StatusCode::OK, "READY")
  } else {
    (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
  }
}
