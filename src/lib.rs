//! 기술적 분석 엔진 라이브러리
//!
//! 캔들 시리즈에 SMA/EMA/RSI 등 지표를 붙이고, 지표별 매수/매도/중립 신호와
//! 종합 판단을 계산합니다.

pub mod analysis;
pub mod config;
pub mod error;
pub mod http;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::analysis::{annotate, AnalysisEngine, AnalysisReport, Annotator};
pub use crate::error::TradingError;
pub use crate::indicators::{ema, rsi, sma, IndicatorSpec};
pub use crate::market_data::CandleSource;
pub use crate::models::{AnnotatedCandle, Candle, CandleRequest, HistoryPeriod, Timeframe};
pub use crate::signals::{aggregate, classify, AggregateAnalysis, IndicatorSignal, Signal};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
