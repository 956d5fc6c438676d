use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::TradingError;
use crate::models::candle::Candle;
use crate::models::timeframe::{CandleRequest, Timeframe};
use super::source::CandleSource;

const DAY_MS: i64 = 86_400_000;

/// Reads `symbol,timestamp,open,high,low,close,volume` rows from one file.
///
/// Rows for other symbols are ignored; only the last `period` worth of rows
/// (measured back from the newest row) is used. Rows finer than the requested
/// timeframe are rolled up into it; coarser rows pass through unchanged.
pub struct CsvCandleSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvCandleSource {
    pub fn new(path: PathBuf, delimiter: char) -> Result<Self, TradingError> {
        if !delimiter.is_ascii() {
            return Err(TradingError::InvalidParameter(format!("delimiter must be ASCII: {:?}", delimiter)));
        }
        Ok(Self { path, delimiter: delimiter as u8 })
    }

    pub fn load_symbol(&self, symbol: &str) -> Result<Vec<Candle>, TradingError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut result = Vec::new();
        for rec in rdr.deserialize() {
            let row: CsvRow = rec?;
            if row.symbol.eq_ignore_ascii_case(symbol) {
                result.push(Candle::new(row.timestamp, row.open, row.high, row.low, row.close, row.volume));
            }
        }
        Ok(result)
    }
}

#[async_trait]
impl CandleSource for CsvCandleSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, TradingError> {
        let candles = self.load_symbol(&request.symbol)?;
        let last_ts = match candles.last() {
            Some(last) => last.timestamp,
            None => return Err(TradingError::DataNotFound(format!("no rows for {}", request.symbol))),
        };

        let start = last_ts - request.period.days() * DAY_MS;
        let window: Vec<Candle> = candles.into_iter().filter(|c| c.timestamp > start).collect();
        Ok(resample(&window, request.timeframe))
    }
}

/// Roll consecutive candles up into `timeframe` buckets.
///
/// Open from the first row of a bucket, close from the last, high/low are the
/// extremes and volume is summed. Expects rows in time order.
pub fn resample(candles: &[Candle], timeframe: Timeframe) -> Vec<Candle> {
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());

    for candle in candles {
        let bucket = timeframe.bucket_start(candle.timestamp);
        match out.last_mut() {
            Some(last) if last.timestamp == bucket => {
                last.high = last.high.max(candle.high);
                last.low = last.low.min(candle.low);
                last.close = candle.close;
                last.volume = last.volume.saturating_add(candle.volume);
            }
            _ => out.push(Candle { timestamp: bucket, ..*candle }),
        }
    }

    out
}

#[derive(serde::Deserialize)]
struct CsvRow {
    symbol: String,
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::models::timeframe::{HistoryPeriod, Timeframe};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_filters_symbol_and_period() {
        let mut contents = String::from("symbol,timestamp,open,high,low,close,volume\n");
        for day in 0..10i64 {
            contents.push_str(&format!("EURUSD,{},1.1,1.2,1.0,1.15,100\n", day * DAY_MS));
            contents.push_str(&format!("GBPUSD,{},1.3,1.4,1.2,1.35,100\n", day * DAY_MS));
        }
        let path = write_temp("tradedesk_ta_csv_source_test.csv", &contents);

        let source = CsvCandleSource::new(path.clone(), ',').unwrap();
        let request = CandleRequest::new("eurusd", Timeframe::OneDay, HistoryPeriod::OneWeek);
        let candles = source.fetch_candles(&request).await.unwrap();

        assert_eq!(candles.len(), 7);
        assert_eq!(candles.last().unwrap().timestamp, 9 * DAY_MS);
        assert!(candles.iter().all(|c| c.open == 1.1));

        let missing = CandleRequest::new("XAUUSD", Timeframe::OneDay, HistoryPeriod::OneWeek);
        assert!(matches!(source.fetch_candles(&missing).await, Err(TradingError::DataNotFound(_))));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file() {
        let source = CsvCandleSource::new(PathBuf::from("./data/does-not-exist.csv"), ',').unwrap();
        assert!(matches!(source.load_symbol("EURUSD"), Err(TradingError::IoError(_))));
    }

    #[tokio::test]
    async fn test_rolls_minutes_up_to_requested_timeframe() {
        let hour = Timeframe::OneHour.duration_ms();
        let mut contents = String::from("symbol,timestamp,open,high,low,close,volume\n");
        // 1분봉 120개 -> 1시간봉 2개
        for i in 0..120i64 {
            let price = 100.0 + i as f64;
            contents.push_str(&format!("BTCUSD,{},{},{},{},{},1\n", i * 60_000, price, price + 0.5, price - 0.5, price + 0.25));
        }
        let path = write_temp("tradedesk_ta_csv_resample_test.csv", &contents);

        let source = CsvCandleSource::new(path.clone(), ',').unwrap();
        let request = CandleRequest::new("BTCUSD", Timeframe::OneHour, HistoryPeriod::OneWeek);
        let candles = source.fetch_candles(&request).await.unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0], Candle::new(0, 100.0, 159.5, 99.5, 159.25, 60));
        assert_eq!(candles[1].timestamp, hour);
        assert_eq!(candles[1].open, 160.0);
        assert_eq!(candles[1].close, 219.25);

        // 요청보다 굵은 행은 그대로
        let minute = CandleRequest::new("BTCUSD", Timeframe::OneMinute, HistoryPeriod::OneWeek);
        assert_eq!(source.fetch_candles(&minute).await.unwrap().len(), 120);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_resample_keeps_coarser_rows() {
        let day = Timeframe::OneDay.duration_ms();
        let candles = vec![
            Candle::new(0, 1.0, 1.2, 0.9, 1.1, 5),
            Candle::new(day, 1.1, 1.3, 1.0, 1.2, 6),
        ];
        assert_eq!(resample(&candles, Timeframe::FourHours), candles);
    }
}
