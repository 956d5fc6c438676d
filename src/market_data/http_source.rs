/**
* filename : http_source
* author : HAMA
* date: 2025. 5. 9.
* description: REST 차트 엔드포인트에서 캔들 조회
**/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::TradingError;
use crate::models::candle::Candle;
use crate::models::timeframe::CandleRequest;
use crate::utils::parse_timestamp;
use super::source::CandleSource;

/// Explicit connection settings, passed in instead of read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    symbol: Option<String>,
    data: Vec<ChartPoint>,
}

#[derive(Debug, Deserialize)]
struct ChartPoint {
    timestamp: serde_json::Value,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: u64,
}

impl ChartPoint {
    fn into_candle(self) -> Result<Candle, TradingError> {
        let timestamp = match &self.timestamp {
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| TradingError::ParseError(format!("bad timestamp: {}", n)))?,
            serde_json::Value::String(s) => parse_timestamp(s)?,
            other => return Err(TradingError::ParseError(format!("bad timestamp: {}", other))),
        };

        Ok(Candle::new(timestamp, self.open, self.high, self.low, self.close, self.volume))
    }
}

pub struct HttpCandleSource {
    client: Client,
    config: HttpSourceConfig,
}

impl HttpCandleSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, TradingError> {
        let mut builder = Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        Ok(HttpCandleSource { client, config })
    }

    pub fn chart_url(&self, symbol: &str) -> String {
        format!("{}/market/chart/{}", self.config.base_url.trim_end_matches('/'), symbol)
    }

    /// Decodes a chart response body.
    pub fn parse_body(body: &str) -> Result<Vec<Candle>, TradingError> {
        let response: ChartResponse =
            serde_json::from_str(body).map_err(|e| TradingError::ParseError(e.to_string()))?;

        if let Some(symbol) = &response.symbol {
            log::debug!("차트 응답 수신: {} ({}개)", symbol, response.data.len());
        }

        response.data.into_iter().map(ChartPoint::into_candle).collect()
    }
}

#[async_trait]
impl CandleSource for HttpCandleSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, TradingError> {
        let url = self.chart_url(&request.symbol);
        let mut req = self.client.get(&url).query(&[
            ("interval", request.timeframe.as_str()),
            ("period", request.period.as_str()),
        ]);
        if let Some(token) = &self.config.api_token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TradingError::DataNotFound(format!("no chart data for {}", request.symbol)));
        }
        if !status.is_success() {
            return Err(TradingError::HttpError(format!("chart request failed: {}", status)));
        }

        let body = response.text().await?;
        Self::parse_body(&body)
    }
}
