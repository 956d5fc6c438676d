//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::TradingError;
use crate::signals::signal_types::AggregateAnalysis;

pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화 (RUST_LOG가 설정 파일보다 우선)
pub fn init(default_level: &str) -> Result<(), TradingError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
        .filter_level(parse_level(&log_level))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| TradingError::ConfigError(format!("logger already initialised: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 분석 시작 로그
pub fn log_analysis_start(source: &str, symbol: &str, timeframe: &str) {
    log::info!("분석 시작: {} - 심볼: {} - 간격: {}", source, symbol, timeframe);
}

/// 분석 종료 로그
pub fn log_analysis_end(symbol: &str, candles: usize, aggregate: &AggregateAnalysis) {
    log::info!(
        "분석 완료: {} - 캔들: {} - 종합: {} ({:.1}) - 매수/매도/중립: {}/{}/{}",
        symbol,
        candles,
        aggregate.overall,
        aggregate.strength,
        aggregate.counts.buy,
        aggregate.counts.sell,
        aggregate.counts.neutral
    );
}

/// 오류 로그
pub fn log_error(context: &str, error: &TradingError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
