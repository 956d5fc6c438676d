/**
* filename : spec
* author : HAMA
* date: 2025. 5. 11.
* description: 요청된 지표 설정 (종류 + 기간)
**/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TradingError;
use super::moving_averages::{ExponentialMovingAverage, SimpleMovingAverage};
use super::oscillators::{RangeOscillator, RelativeStrengthIndex};
use super::trend::{BollingerPercentB, BOLLINGER_K, MACD};
use super::Indicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorKind {
  Sma,
  Ema,
  Rsi,
  Stochastic,
  WilliamsR,
  Cci,
  Bollinger,
  /// `period` of the owning spec is the signal period.
  Macd { fast: usize, slow: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorSpec {
  #[serde(flatten)]
  pub kind: IndicatorKind,
  pub period: usize,
}

impl IndicatorSpec {
  pub fn new(kind: IndicatorKind, period: usize) -> Self {
    IndicatorSpec { kind, period }
  }

  pub fn sma(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Sma, period)
  }

  pub fn ema(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Ema, period)
  }

  pub fn rsi(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Rsi, period)
  }

  pub fn stochastic(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Stochastic, period)
  }

  pub fn williams_r(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::WilliamsR, period)
  }

  pub fn cci(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Cci, period)
  }

  pub fn bollinger(period: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Bollinger, period)
  }

  pub fn macd(fast: usize, slow: usize, signal: usize) -> Self {
    IndicatorSpec::new(IndicatorKind::Macd { fast, slow }, signal)
  }

  /// The chart's default set: SMA(20), EMA(12), RSI(14).
  pub fn chart_defaults() -> Vec<IndicatorSpec> {
    vec![IndicatorSpec::sma(20), IndicatorSpec::ema(12), IndicatorSpec::rsi(14)]
  }

  /// Chart defaults plus the technical-analysis panel indicators.
  pub fn panel_defaults() -> Vec<IndicatorSpec> {
    let mut specs = IndicatorSpec::chart_defaults();
    specs.extend([
      IndicatorSpec::macd(12, 26, 9),
      IndicatorSpec::bollinger(20),
      IndicatorSpec::stochastic(14),
      IndicatorSpec::williams_r(14),
      IndicatorSpec::cci(20),
    ]);
    specs
  }

  pub fn validate(&self) -> Result<(), TradingError> {
    if self.period == 0 {
      return Err(TradingError::InvalidParameter(format!("{}: period must be at least 1", self.label())));
    }
    if let IndicatorKind::Macd { fast, slow } = self.kind {
      if fast == 0 || fast >= slow {
        return Err(TradingError::InvalidParameter(format!(
          "{}: fast period must be positive and below slow period",
          self.label()
        )));
      }
    }
    Ok(())
  }

  /// Field name used on annotated candles (`sma20`, `rsi14`, `macd12_26_9`).
  pub fn key(&self) -> String {
    match self.kind {
      IndicatorKind::Sma => format!("sma{}", self.period),
      IndicatorKind::Ema => format!("ema{}", self.period),
      IndicatorKind::Rsi => format!("rsi{}", self.period),
      IndicatorKind::Stochastic => format!("stoch{}", self.period),
      IndicatorKind::WilliamsR => format!("willr{}", self.period),
      IndicatorKind::Cci => format!("cci{}", self.period),
      IndicatorKind::Bollinger => format!("bbp{}", self.period),
      IndicatorKind::Macd { fast, slow } => format!("macd{}_{}_{}", fast, slow, self.period),
    }
  }

  /// Display name (`RSI(14)`).
  pub fn label(&self) -> String {
    match self.kind {
      IndicatorKind::Sma => format!("SMA({})", self.period),
      IndicatorKind::Ema => format!("EMA({})", self.period),
      IndicatorKind::Rsi => format!("RSI({})", self.period),
      IndicatorKind::Stochastic => format!("Stochastic({})", self.period),
      IndicatorKind::WilliamsR => format!("Williams %R({})", self.period),
      IndicatorKind::Cci => format!("CCI({})", self.period),
      IndicatorKind::Bollinger => format!("Bollinger %B({})", self.period),
      IndicatorKind::Macd { fast, slow } => format!("MACD({},{},{})", fast, slow, self.period),
    }
  }

  /// Index of the first candle that gets a value.
  pub fn first_index(&self) -> usize {
    match self.kind {
      IndicatorKind::Rsi => self.period,
      IndicatorKind::Macd { slow, .. } => (slow + self.period).saturating_sub(2),
      _ => self.period.saturating_sub(1),
    }
  }

  pub fn build(&self) -> Result<Box<dyn Indicator>, TradingError> {
    self.validate()?;

    let indicator: Box<dyn Indicator> = match self.kind {
      IndicatorKind::Sma => Box::new(SimpleMovingAverage::new(self.period)),
      IndicatorKind::Ema => Box::new(ExponentialMovingAverage::new(self.period)),
      IndicatorKind::Rsi => Box::new(RelativeStrengthIndex::new(self.period)),
      IndicatorKind::Stochastic => Box::new(RangeOscillator::stochastic(self.period)),
      IndicatorKind::WilliamsR => Box::new(RangeOscillator::williams_r(self.period)),
      IndicatorKind::Cci => Box::new(RangeOscillator::cci(self.period)),
      IndicatorKind::Bollinger => Box::new(BollingerPercentB::new(self.period, BOLLINGER_K)),
      IndicatorKind::Macd { fast, slow } => Box::new(MACD::new(fast, slow, self.period)),
    };
    Ok(indicator)
  }
}

impl fmt::Display for IndicatorSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.label())
  }
}
