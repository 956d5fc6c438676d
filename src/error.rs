/**
* filename : error
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid candle at index {index}: {reason}")]
    Validation { index: usize, reason: String },

    #[error("Data not found: {0}")]
    DataNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl TradingError {
    pub fn validation(index: usize, reason: impl Into<String>) -> Self {
        TradingError::Validation { index, reason: reason.into() }
    }

    /// 호출자 입력 문제인지 (HTTP 400 대상)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TradingError::InvalidParameter(_) | TradingError::Validation { .. } | TradingError::ParseError(_)
        )
    }
}

impl From<reqwest::Error> for TradingError {
    fn from(e: reqwest::Error) -> Self {
        TradingError::HttpError(e.to_string())
    }
}

// 파일을 못 읽은 경우는 서버 쪽 IO 오류, 행 형식 오류만 ParseError
impl From<csv::Error> for TradingError {
    fn from(e: csv::Error) -> Self {
        let message = e.to_string();
        match e.into_kind() {
            csv::ErrorKind::Io(io) => TradingError::IoError(io),
            _ => TradingError::ParseError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_io_error_is_not_client_error() {
        let err: TradingError = csv::Reader::from_path("./data/does-not-exist.csv").unwrap_err().into();
        assert!(matches!(err, TradingError::IoError(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_csv_row_error_is_parse_error() {
        let mut rdr = csv::Reader::from_reader("a,b\n1\n".as_bytes());
        let err: TradingError = rdr.records().next().unwrap().unwrap_err().into();
        assert!(matches!(err, TradingError::ParseError(_)));
        assert!(err.is_client_error());
    }
}
