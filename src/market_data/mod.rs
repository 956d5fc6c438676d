pub mod csv_source;
pub mod http_source;
pub mod mock;
pub mod series;
pub mod source;
pub mod stream;

use std::path::PathBuf;
use std::sync::Arc;

pub use csv_source::CsvCandleSource;
pub use http_source::{HttpCandleSource, HttpSourceConfig};
pub use mock::MockCandleSource;
pub use series::CandleSeries;
pub use source::CandleSource;
pub use stream::TickStream;

use crate::config::{SourceConfig, SourceKind};
use crate::error::TradingError;

/// 설정에 맞는 캔들 소스 생성
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn CandleSource>, TradingError> {
    match config.kind {
        SourceKind::Mock => Ok(Arc::new(MockCandleSource::new(config.seed))),
        SourceKind::Http => {
            let base_url = config
                .base_url
                .clone()
                .ok_or_else(|| TradingError::ConfigError("source.base_url is required for http source".to_string()))?;
            let source = HttpCandleSource::new(HttpSourceConfig {
                base_url,
                api_token: config.api_token.clone(),
                timeout_ms: config.timeout_ms,
            })?;
            Ok(Arc::new(source))
        }
        SourceKind::Csv => {
            let path = config
                .csv_path
                .clone()
                .ok_or_else(|| TradingError::ConfigError("source.csv_path is required for csv source".to_string()))?;
            Ok(Arc::new(CsvCandleSource::new(PathBuf::from(path), ',')?))
        }
    }
}
