/**
* filename : mock
* author : HAMA
* date: 2025. 5. 9.
* description: 외부 API 없이 쓰는 결정적 모의 캔들 소스
**/

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TradingError;
use crate::models::candle::Candle;
use crate::models::timeframe::{CandleRequest, Timeframe};
use crate::utils::current_timestamp_ms;
use super::source::CandleSource;

const DAY_MS: i64 = 86_400_000;

/// Random-walk candles, reproducible for a given seed, symbol and timeframe.
pub struct MockCandleSource {
    seed: u64,
    max_candles: usize,
    end_ms: Option<i64>,
}

impl MockCandleSource {
    pub fn new(seed: u64) -> Self {
        MockCandleSource {
            seed,
            max_candles: 500,
            end_ms: None,
        }
    }

    pub fn with_max_candles(mut self, max_candles: usize) -> Self {
        self.max_candles = max_candles.max(1);
        self
    }

    /// Pins the last candle's time instead of using the clock.
    pub fn with_end(mut self, end_ms: i64) -> Self {
        self.end_ms = Some(end_ms);
        self
    }

    pub fn base_price(symbol: &str) -> f64 {
        match symbol.to_uppercase().as_str() {
            "EURUSD" => 1.0856,
            "GBPUSD" => 1.27,
            "BTCUSD" => 43000.0,
            "ETHUSD" => 2650.0,
            _ => 100.0,
        }
    }

    pub fn candle_count(&self, timeframe: Timeframe, days: i64) -> usize {
        let count = (days * DAY_MS / timeframe.duration_ms()) as usize;
        count.clamp(1, self.max_candles)
    }

    pub fn generate(&self, request: &CandleRequest) -> Vec<Candle> {
        let count = self.candle_count(request.timeframe, request.period.days());
        let step = request.timeframe.duration_ms();
        let end = request
            .timeframe
            .bucket_start(self.end_ms.unwrap_or_else(current_timestamp_ms));

        let mut rng = StdRng::seed_from_u64(self.seed ^ symbol_hash(&request.symbol, request.timeframe));
        let mut price = Self::base_price(&request.symbol);
        let mut candles = Vec::with_capacity(count);

        for i in 0..count {
            let timestamp = end - (count - 1 - i) as i64 * step;
            let volatility = price * 0.002;
            let change = (rng.gen::<f64>() - 0.5) * volatility;

            let open = price;
            let close = open + change;
            let high = open.max(close) + rng.gen::<f64>() * volatility * 0.5;
            let low = open.min(close) - rng.gen::<f64>() * volatility * 0.5;
            let volume = (rng.gen::<f64>() * 1_000_000.0 + 500_000.0).round() as u64;

            candles.push(Candle::new(timestamp, open, high, low, close, volume));
            price = close;
        }

        candles
    }
}

// FNV-1a, 실행 간 동일한 시드를 위해 고정 해시 사용
fn symbol_hash(symbol: &str, timeframe: Timeframe) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in symbol.to_uppercase().bytes().chain(timeframe.as_str().bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl CandleSource for MockCandleSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, TradingError> {
        if request.symbol.trim().is_empty() {
            return Err(TradingError::InvalidParameter("symbol must not be empty".to_string()));
        }
        Ok(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candle::validate_series;
    use crate::models::timeframe::HistoryPeriod;

    #[test]
    fn test_deterministic_and_valid() {
        let source = MockCandleSource::new(7).with_end(1_700_000_000_000);
        let request = CandleRequest::new("EURUSD", Timeframe::OneDay, HistoryPeriod::OneMonth);

        let a = source.generate(&request);
        let b = source.generate(&request);

        assert_eq!(a.len(), 30);
        assert_eq!(a, b);
        assert!(validate_series(&a).is_ok());
        assert!((a[0].open - 1.0856).abs() < 1e-12);
    }

    #[test]
    fn test_candle_count_is_capped() {
        let source = MockCandleSource::new(1).with_max_candles(100);
        assert_eq!(source.candle_count(Timeframe::OneHour, 30), 100);
        assert_eq!(source.candle_count(Timeframe::OneDay, 7), 7);
    }

    #[test]
    fn test_symbols_differ() {
        let source = MockCandleSource::new(7).with_end(1_700_000_000_000);
        let btc = source.generate(&CandleRequest::new("BTCUSD", Timeframe::OneHour, HistoryPeriod::OneWeek));
        let eth = source.generate(&CandleRequest::new("ETHUSD", Timeframe::OneHour, HistoryPeriod::OneWeek));
        assert_ne!(btc[0].close, eth[0].close);
    }

    #[tokio::test]
    async fn test_rejects_empty_symbol() {
        let source = MockCandleSource::new(1);
        let request = CandleRequest::new(" ", Timeframe::OneDay, HistoryPeriod::OneWeek);
        assert!(source.fetch_candles(&request).await.is_err());
    }
}
