/**
* filename : candle
* author : HAMA
* date: 2025. 5. 8.
* description: OHLCV 캔들과 실시간 틱
**/

use serde::{Deserialize, Serialize};

use crate::error::TradingError;

/// One OHLCV observation. `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 시가=고가=저가=종가인 캔들 (틱으로 새 봉을 열 때)
    pub fn flat(timestamp: i64, price: f64, volume: u64) -> Self {
        Candle::new(timestamp, price, price, price, price, volume)
    }

    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// 단일 캔들 검사 (순서 검사는 `validate_series`)
    pub fn validate(&self, index: usize) -> Result<(), TradingError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(TradingError::validation(index, format!("{} is not a finite number", name)));
            }
            if value <= 0.0 {
                return Err(TradingError::validation(index, format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.low > self.open.min(self.close) {
            return Err(TradingError::validation(
                index,
                format!("low {} is above min(open, close) {}", self.low, self.open.min(self.close)),
            ));
        }
        if self.high < self.open.max(self.close) {
            return Err(TradingError::validation(
                index,
                format!("high {} is below max(open, close) {}", self.high, self.open.max(self.close)),
            ));
        }

        Ok(())
    }
}

/// 시리즈 전체 검사: 첫 번째 문제 레코드에서 실패
pub fn validate_series(candles: &[Candle]) -> Result<(), TradingError> {
    let mut prev_ts: Option<i64> = None;

    for (index, candle) in candles.iter().enumerate() {
        candle.validate(index)?;

        if let Some(prev) = prev_ts {
            if candle.timestamp <= prev {
                return Err(TradingError::validation(
                    index,
                    format!("timestamp {} is not after previous {}", candle.timestamp, prev),
                ));
            }
        }
        prev_ts = Some(candle.timestamp);
    }

    Ok(())
}

/// 푸시 피드에서 들어오는 최신 체결/호가
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: String,
    pub timestamp: i64,
    pub price: f64,
    #[serde(default)]
    pub volume: u64,
}

impl Tick {
    pub fn new(symbol: impl Into<String>, timestamp: i64, price: f64, volume: u64) -> Self {
        Tick {
            symbol: symbol.into(),
            timestamp,
            price,
            volume,
        }
    }
}
