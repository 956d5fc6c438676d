/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;
use crate::indicators::IndicatorSpec;
use crate::models::timeframe::{HistoryPeriod, Timeframe};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Mock,
    Http,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub csv_path: Option<String>,
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub indicators: Vec<IndicatorSpec>,
    pub timeframe: Timeframe,
    pub period: HistoryPeriod,
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Config {
    /// Load configuration from `config.json` in the working directory.
    ///
    /// Also returns the environment overrides that were ignored, so they can
    /// be reported once logging is up.
    pub fn load() -> Result<(Self, Vec<String>), TradingError> {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(config_path: &Path) -> Result<(Self, Vec<String>), TradingError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| TradingError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to read config file: {}", e)))?;

            Self::from_json(&contents)?
        } else {
            // Return default configuration
            Config::default()
        };

        // environment overrides
        let ignored = cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok((cfg, ignored))
    }

    pub fn from_json(contents: &str) -> Result<Self, TradingError> {
        serde_json::from_str(contents)
            .map_err(|e| TradingError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides for sensitive/runtime fields.
    /// Returns a message for each override that could not be applied.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let mut ignored = Vec::new();

        if let Some(v) = get("TA_SOURCE") {
            match v.to_lowercase().as_str() {
                "mock" => self.source.kind = SourceKind::Mock,
                "http" => self.source.kind = SourceKind::Http,
                "csv" => self.source.kind = SourceKind::Csv,
                _ => ignored.push(format!("TA_SOURCE={} (expected mock, http or csv)", v)),
            }
        }
        if let Some(v) = get("TA_API_BASE_URL") { self.source.base_url = Some(v); }
        if let Some(v) = get("TA_API_TOKEN") { self.source.api_token = Some(v); }
        if let Some(v) = get("TA_CSV_PATH") { self.source.csv_path = Some(v); }
        if let Some(v) = get("TA_SERVER_PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => ignored.push(format!("TA_SERVER_PORT={} (not a port number)", v)),
            }
        }

        ignored
    }

    pub fn validate(&self) -> Result<(), TradingError> {
        if self.analysis.refresh_interval_ms == 0 {
            return Err(TradingError::ConfigError("analysis.refresh_interval_ms must be positive".to_string()));
        }
        for spec in &self.analysis.indicators {
            spec.validate()
                .map_err(|e| TradingError::ConfigError(format!("analysis.indicators: {}", e)))?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3030,
            },
            source: SourceConfig {
                kind: SourceKind::Mock,
                base_url: None,
                api_token: None,
                csv_path: None,
                timeout_ms: Some(5000),
                seed: 42,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            analysis: AnalysisConfig {
                indicators: IndicatorSpec::panel_defaults(),
                timeframe: Timeframe::OneHour,
                period: HistoryPeriod::OneWeek,
                refresh_interval_ms: 30_000,
                symbols: vec!["EURUSD".to_string(), "GBPUSD".to_string(), "BTCUSD".to_string(), "ETHUSD".to_string()],
            },
        }
    }
}
