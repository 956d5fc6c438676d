/**
* filename : timeframe
* author : HAMA
* date: 2025. 5. 8.
* description: 차트 봉 간격과 조회 기간
**/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TradingError;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1M")]
    OneMinute,
    #[serde(rename = "5M")]
    FiveMinutes,
    #[serde(rename = "15M")]
    FifteenMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1M",
            Timeframe::FiveMinutes => "5M",
            Timeframe::FifteenMinutes => "15M",
            Timeframe::OneHour => "1H",
            Timeframe::FourHours => "4H",
            Timeframe::OneDay => "1D",
        }
    }

    /// 봉 하나의 길이 (밀리초)
    pub fn duration_ms(&self) -> i64 {
        match self {
            Timeframe::OneMinute => MINUTE_MS,
            Timeframe::FiveMinutes => 5 * MINUTE_MS,
            Timeframe::FifteenMinutes => 15 * MINUTE_MS,
            Timeframe::OneHour => HOUR_MS,
            Timeframe::FourHours => 4 * HOUR_MS,
            Timeframe::OneDay => DAY_MS,
        }
    }

    /// 타임스탬프가 속한 봉의 시작 시각
    pub fn bucket_start(&self, timestamp_ms: i64) -> i64 {
        timestamp_ms - timestamp_ms.rem_euclid(self.duration_ms())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" | "1MIN" => Ok(Timeframe::OneMinute),
            "5M" | "5MIN" => Ok(Timeframe::FiveMinutes),
            "15M" | "15MIN" => Ok(Timeframe::FifteenMinutes),
            "1H" | "60M" => Ok(Timeframe::OneHour),
            "4H" => Ok(Timeframe::FourHours),
            "1D" | "1DAY" | "DAILY" => Ok(Timeframe::OneDay),
            other => Err(TradingError::InvalidParameter(format!("unknown timeframe: {}", other))),
        }
    }
}

/// 조회할 과거 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "1year")]
    OneYear,
}

impl HistoryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneWeek => "1week",
            HistoryPeriod::OneMonth => "1month",
            HistoryPeriod::ThreeMonths => "3months",
            HistoryPeriod::OneYear => "1year",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            HistoryPeriod::OneWeek => 7,
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::OneYear => 365,
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1week" | "1w" => Ok(HistoryPeriod::OneWeek),
            "1month" | "1mo" => Ok(HistoryPeriod::OneMonth),
            "3months" | "3mo" => Ok(HistoryPeriod::ThreeMonths),
            "1year" | "1y" => Ok(HistoryPeriod::OneYear),
            other => Err(TradingError::InvalidParameter(format!("unknown period: {}", other))),
        }
    }
}

/// "심볼/간격/기간" 조회 요청
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandleRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub period: HistoryPeriod,
}

impl CandleRequest {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, period: HistoryPeriod) -> Self {
        CandleRequest {
            symbol: symbol.into(),
            timeframe,
            period,
        }
    }
}
