//! Upstream API proxy.
//!
//! `GET /api/<path>?<query>` is forwarded to `<upstream>/<path>?<query>`
//! and the body relayed as JSON. Any upstream failure becomes a 500
//! with `{"error": "..."}`.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use super::AppState;

/// Strip the `/api` prefix, keeping the query string.
pub fn upstream_path(uri: &Uri) -> String {
  let path_and_query = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
  path_and_query
    .strip_prefix("/api")
    .unwrap_or(path_and_query)
    .to_string()
}

pub async fn forward(State(state): State<AppState>, uri: Uri) -> Response {
  let path = upstream_path(&uri);
  info!(upstream = %state.upstream.base_url(), path = %path, "Proxying");

  let (outcome, response) = match state.upstream.fetch(&path).await {
    Ok(body) => {
      info!(bytes = body.len(), "Proxy success");
      ("ok", ([(CONTENT_TYPE, "application/json")], body).into_response())
    }
    Err(e) => {
      warn!(error = %e, "Proxy error");
      (
        "error",
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": format!("{e:#}") })),
        )
          .into_response(),
      )
    }
  };

  if let Some(metrics) = &state.metrics {
    metrics.proxy_requests.with_label_values(&[outcome]).inc();
  }
  response
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_upstream_path_strips_prefix() {
    let uri: Uri = "/api/markets/active?page=2&limit=10".parse().unwrap();
    assert_eq!(upstream_path(&uri), "/markets/active?page=2&limit=10");
  }

  #[test]
  fn test_upstream_path_without_query() {
    let uri: Uri = "/api/categories".parse().unwrap();
    assert_eq!(upstream_path(&uri), "/categories");
  }
}
