//! 시간 관련 유틸리티
//!
//! 시간 변환, 포맷팅, 파싱 함수 제공

pub mod logging;
pub mod math;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::TradingError;

/// 타임스탬프(밀리초)를 DateTime<Utc>로 변환
pub fn timestamp_to_datetime(timestamp_ms: i64) -> DateTime<Utc> {
  Utc.timestamp_millis_opt(timestamp_ms).single().unwrap_or_default()
}

/// DateTime<Utc>를 타임스탬프(밀리초)로 변환
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
  dt.timestamp_millis()
}

/// 현재 시간을 타임스탬프(밀리초)로 반환
pub fn current_timestamp_ms() -> i64 {
  datetime_to_timestamp(Utc::now())
}

/// 타임스탬프(밀리초)를 포맷팅된 문자열로 변환
pub fn format_timestamp(timestamp_ms: i64, format: &str) -> String {
  timestamp_to_datetime(timestamp_ms).format(format).to_string()
}

/// 외부 응답의 타임스탬프 파싱: epoch 밀리초, RFC 3339, `YYYY-MM-DD`
pub fn parse_timestamp(raw: &str) -> Result<i64, TradingError> {
  let raw = raw.trim();

  if let Ok(ms) = raw.parse::<i64>() {
    return Ok(ms);
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.timestamp_millis());
  }
  if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
    if let Some(naive) = date.and_hms_opt(0, 0, 0) {
      return Ok(Utc.from_utc_datetime(&naive).timestamp_millis());
    }
  }

  Err(TradingError::ParseError(format!("unrecognised timestamp: {}", raw)))
}
