use async_trait::async_trait;

use crate::error::TradingError;
use crate::models::candle::Candle;
use crate::models::timeframe::CandleRequest;

/// Data-fetch strategy: "get candles for symbol/interval/period".
///
/// Implementations return the series oldest first. They are not expected to
/// validate it; the annotator does.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Short name for logs ("mock", "http", "csv").
    fn name(&self) -> &str;

    /// 심볼/간격/기간에 해당하는 캔들 조회
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, TradingError>;
}
