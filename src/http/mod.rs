use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
  Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::engine::{AnalysisEngine, AnalysisReport, AnalysisSummary};
use crate::error::TradingError;
use crate::models::timeframe::{CandleRequest, HistoryPeriod, Timeframe};

#[derive(Clone)]
pub struct AppState {
  pub engine: Arc<AnalysisEngine>,
  pub default_timeframe: Timeframe,
  pub default_period: HistoryPeriod,
}

#[derive(Debug, Serialize)]
struct Health { status: &'static str }

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
  pub interval: Option<String>,
  pub period: Option<String>,
}

/// Maps crate errors onto HTTP status codes with a `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(pub TradingError);

impl From<TradingError> for ApiError {
  fn from(e: TradingError) -> Self { ApiError(e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = if self.0.is_client_error() {
      StatusCode::BAD_REQUEST
    } else if matches!(self.0, TradingError::DataNotFound(_)) {
      StatusCode::NOT_FOUND
    } else {
      StatusCode::BAD_GATEWAY
    };
    (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
  }
}

pub fn build_router(state: AppState) -> Router {
  let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);

  Router::new()
    .route("/health", get(|| async { Json(Health { status: "ok" }) }))
    .route("/analysis/:symbol", get(get_analysis))
    .route("/analysis/:symbol/summary", get(get_summary))
    .with_state(state)
    .layer(cors)
}

fn to_request(state: &AppState, symbol: String, query: AnalysisQuery) -> Result<CandleRequest, TradingError> {
  let timeframe = match query.interval.as_deref() {
    Some(s) => Timeframe::from_str(s)?,
    None => state.default_timeframe,
  };
  let period = match query.period.as_deref() {
    Some(s) => HistoryPeriod::from_str(s)?,
    None => state.default_period,
  };
  Ok(CandleRequest::new(symbol.to_uppercase(), timeframe, period))
}

async fn get_analysis(
  Path(symbol): Path<String>,
  Query(query): Query<AnalysisQuery>,
  State(state): State<AppState>,
) -> Result<Json<AnalysisReport>, ApiError> {
  let request = to_request(&state, symbol, query)?;
  Ok(Json(state.engine.run(&request).await?))
}

async fn get_summary(
  Path(symbol): Path<String>,
  Query(query): Query<AnalysisQuery>,
  State(state): State<AppState>,
) -> Result<Json<AnalysisSummary>, ApiError> {
  let request = to_request(&state, symbol, query)?;
  let report = state.engine.run(&request).await?;
  Ok(Json(report.summary()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    let status = |e: TradingError| ApiError(e).into_response().status();
    assert_eq!(status(TradingError::InvalidParameter("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status(TradingError::validation(3, "bad")), StatusCode::BAD_REQUEST);
    assert_eq!(status(TradingError::DataNotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(status(TradingError::HttpError("down".into())), StatusCode::BAD_GATEWAY);
  }
}
