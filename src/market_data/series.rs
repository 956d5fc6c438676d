/**
* filename : series
* author : HAMA
* date: 2025. 5. 9.
* description: 한 심볼/간격의 캔들 시리즈 보관
**/

use crate::error::TradingError;
use crate::models::candle::{validate_series, Candle, Tick};
use crate::models::timeframe::Timeframe;

#[derive(Debug, Clone)]
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        CandleSeries {
            symbol: symbol.into(),
            timeframe,
            candles: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// 재조회 결과로 교체. 검증 실패 시 기존 시리즈 유지
    pub fn replace(&mut self, candles: Vec<Candle>) -> Result<(), TradingError> {
        validate_series(&candles)?;
        self.candles = candles;
        Ok(())
    }

    /// 새 캔들 추가
    pub fn push(&mut self, candle: Candle) -> Result<(), TradingError> {
        let index = self.candles.len();
        candle.validate(index)?;

        if let Some(last) = self.candles.last() {
            if candle.timestamp <= last.timestamp {
                return Err(TradingError::validation(
                    index,
                    format!("timestamp {} is not after previous {}", candle.timestamp, last.timestamp),
                ));
            }
        }

        self.candles.push(candle);
        Ok(())
    }

    /// 실시간 틱 반영: 같은 봉이면 갱신, 다음 봉이면 새로 생성
    pub fn apply_tick(&mut self, tick: &Tick) -> Result<(), TradingError> {
        let index = self.candles.len();
        if !tick.price.is_finite() || tick.price <= 0.0 {
            return Err(TradingError::validation(index, format!("tick price must be positive, got {}", tick.price)));
        }

        let bucket = self.timeframe.bucket_start(tick.timestamp);
        let last_bucket = self.candles.last().map(|c| self.timeframe.bucket_start(c.timestamp));

        match last_bucket {
            Some(last_bucket) if last_bucket > bucket => Err(TradingError::validation(
                index,
                format!("tick at {} is older than the last candle bucket {}", tick.timestamp, last_bucket),
            )),
            Some(last_bucket) if last_bucket == bucket => {
                if let Some(last) = self.candles.last_mut() {
                    last.close = tick.price;
                    last.high = last.high.max(tick.price);
                    last.low = last.low.min(tick.price);
                    last.volume = last.volume.saturating_add(tick.volume);
                }
                Ok(())
            }
            _ => {
                self.candles.push(Candle::flat(bucket, tick.price, tick.volume));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    fn candle(ts: i64, close: f64) -> Candle {
        Candle::new(ts, close, close + 1.0, close - 1.0, close, 10)
    }

    #[test]
    fn test_replace_keeps_old_on_failure() {
        let mut series = CandleSeries::new("BTCUSD", Timeframe::OneHour);
        series.replace(vec![candle(0, 100.0), candle(HOUR, 101.0)]).unwrap();

        let bad = vec![candle(HOUR, 100.0), candle(0, 101.0)];
        assert!(series.replace(bad).is_err());
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![100.0, 101.0]);
    }

    #[test]
    fn test_push_requires_order() {
        let mut series = CandleSeries::new("BTCUSD", Timeframe::OneHour);
        series.push(candle(HOUR, 100.0)).unwrap();
        assert!(series.push(candle(HOUR, 100.0)).is_err());
        assert!(series.push(candle(2 * HOUR, 100.0)).is_ok());
    }

    #[test]
    fn test_apply_tick_updates_and_rolls() {
        let mut series = CandleSeries::new("BTCUSD", Timeframe::OneHour);
        series.push(candle(0, 100.0)).unwrap();

        // 같은 봉 내부
        series.apply_tick(&Tick::new("BTCUSD", HOUR / 2, 103.5, 5)).unwrap();
        let last = *series.last().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(last.close, 103.5);
        assert_eq!(last.high, 103.5);
        assert_eq!(last.low, 99.0);
        assert_eq!(last.volume, 15);

        // 다음 봉
        series.apply_tick(&Tick::new("BTCUSD", HOUR + 10, 104.0, 2)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(*series.last().unwrap(), Candle::flat(HOUR, 104.0, 2));

        // 과거 틱 거부
        assert!(series.apply_tick(&Tick::new("BTCUSD", 10, 99.0, 1)).is_err());
        assert!(series.apply_tick(&Tick::new("BTCUSD", HOUR + 20, -1.0, 1)).is_err());
    }

    #[test]
    fn test_apply_tick_on_empty_series() {
        let mut series = CandleSeries::new("ETHUSD", Timeframe::FiveMinutes);
        series.apply_tick(&Tick::new("ETHUSD", 301_000, 2650.0, 1)).unwrap();
        assert_eq!(series.last().unwrap().timestamp, 300_000);
    }
}
