//! Market and trading panel endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ApiError, AppState};
use crate::domain::market::{Confirmation, Side};
use crate::domain::stake::Preset;
use crate::usecases::market_detail::MarketDetailView;
use crate::usecases::trading_panel::{PanelView, SubmitError};

/// Body of `POST /market/panels/:side/stake`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeInput {
  /// One of the preset amounts, e.g. `{"preset": 50}`.
  Preset(Decimal),
  /// Free-form entry, e.g. `{"custom": "25"}` or `{"custom": 25}`.
  Custom(CustomAmount),
}

/// Custom stake as typed, either a JSON string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CustomAmount {
  Text(String),
  Number(serde_json::Number),
}

impl CustomAmount {
  fn raw(&self) -> String {
    match self {
      Self::Text(text) => text.clone(),
      Self::Number(number) => number.to_string(),
    }
  }
}

pub async fn market(State(state): State<AppState>) -> Json<MarketDetailView> {
  Json(state.detail.view())
}

pub async fn panel(
  State(state): State<AppState>,
  Path(side): Path<String>,
) -> Result<Json<PanelView>, ApiError> {
  let side: Side = side.parse()?;
  Ok(Json(state.detail.panel(side).view()))
}

/// Select a preset or record a custom stake.
///
/// An invalid custom entry is recorded and reported through the view's
/// `validation_message`; only an amount that is not a preset is refused.
#[instrument(skip(state))]
pub async fn set_stake(
  State(state): State<AppState>,
  Path(side): Path<String>,
  Json(input): Json<StakeInput>,
) -> Result<Json<PanelView>, ApiError> {
  let side: Side = side.parse()?;
  let panel = state.detail.panel(side);

  match input {
    StakeInput::Preset(amount) => {
      let preset = Preset::from_amount(amount).ok_or_else(|| {
        ApiError::Unprocessable(format!("no preset for amount {amount} (expected 10, 50 or 100)"))
      })?;
      panel.select_preset(preset);
    }
    StakeInput::Custom(amount) => {
      if let Err(e) = panel.set_custom(&amount.raw()) {
        debug!(error = %e, "Invalid custom stake recorded");
      }
    }
  }

  Ok(Json(panel.view()))
}

/// Submit the panel's current stake and wait for settlement.
///
/// The submission runs in its own task: once accepted it settles and
/// reaches the listener even if the client goes away mid-request.
#[instrument(skip(state))]
pub async fn trade(
  State(state): State<AppState>,
  Path(side): Path<String>,
) -> Result<Json<Confirmation>, ApiError> {
  let side: Side = side.parse()?;
  let label = [side.as_str()];

  let detail = Arc::clone(&state.detail);
  let outcome = tokio::spawn(async move { detail.panel(side).submit().await })
    .await
    .map_err(|e| ApiError::Internal(format!("submission task failed: {e}")))?;

  match outcome {
    Ok(Some(confirmation)) => Ok(Json(confirmation)),
    Ok(None) => {
      if let Some(metrics) = &state.metrics {
        metrics.submissions_ignored.with_label_values(&label).inc();
      }
      Err(ApiError::Conflict)
    }
    Err(e) => {
      let reason = match &e {
        SubmitError::InvalidStake(_) => Some("invalid_stake"),
        SubmitError::Pricing(_) => Some("pricing"),
        SubmitError::SubmissionFailed(_) => None,
      };
      if let (Some(metrics), Some(reason)) = (&state.metrics, reason) {
        metrics
          .submissions_rejected
          .with_label_values(&[side.as_str(), reason])
          .inc();
      }
      Err(e.into())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_stake_input_shapes() {
    let preset: StakeInput = serde_json::from_str(r#"{"preset": 50}"#).unwrap();
    assert!(matches!(preset, StakeInput::Preset(amount) if amount == dec!(50)));

    let text: StakeInput = serde_json::from_str(r#"{"custom": "25"}"#).unwrap();
    let StakeInput::Custom(text) = text else { panic!("expected custom") };
    assert_eq!(text.raw(), "25");

    let number: StakeInput = serde_json::from_str(r#"{"custom": 12.5}"#).unwrap();
    let StakeInput::Custom(number) = number else { panic!("expected custom") };
    assert_eq!(number.raw(), "12.5");
  }
}
