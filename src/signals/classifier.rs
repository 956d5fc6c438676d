/**
* filename : classifier
* author : HAMA
* date: 2025. 5. 11.
* description: 지표 값 -> 매수/매도/중립 분류
**/

use crate::error::TradingError;
use crate::indicators::spec::{IndicatorKind, IndicatorSpec};
use crate::models::annotated::AnnotatedCandle;
use crate::utils::math::clamp;
use super::signal_types::{IndicatorSignal, Signal};

/// Price deviation (as a fraction of close) at which price-relative strength saturates.
pub const FULL_DEVIATION: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalRule {
  /// Sell above `sell_above`, buy below `buy_below` (both strict).
  /// `floor`/`ceiling` bound the scale used for strength.
  Bands {
    sell_above: f64,
    buy_below: f64,
    floor: f64,
    ceiling: f64,
  },
  /// Close above the average is a buy, below is a sell.
  PriceVsAverage,
  /// Positive value is a buy, negative a sell; strength relative to close.
  ZeroLine,
}

impl SignalRule {
  pub fn for_kind(kind: IndicatorKind) -> SignalRule {
    match kind {
      IndicatorKind::Rsi => SignalRule::Bands { sell_above: 70.0, buy_below: 30.0, floor: 0.0, ceiling: 100.0 },
      IndicatorKind::Stochastic => SignalRule::Bands { sell_above: 80.0, buy_below: 20.0, floor: 0.0, ceiling: 100.0 },
      IndicatorKind::WilliamsR => SignalRule::Bands { sell_above: -20.0, buy_below: -80.0, floor: -100.0, ceiling: 0.0 },
      IndicatorKind::Cci => SignalRule::Bands { sell_above: 100.0, buy_below: -100.0, floor: -300.0, ceiling: 300.0 },
      IndicatorKind::Bollinger => SignalRule::Bands { sell_above: 1.0, buy_below: 0.0, floor: -0.5, ceiling: 1.5 },
      IndicatorKind::Sma | IndicatorKind::Ema => SignalRule::PriceVsAverage,
      IndicatorKind::Macd { .. } => SignalRule::ZeroLine,
    }
  }

  /// Returns the signal and its 0-100 strength.
  pub fn apply(&self, value: f64, close: f64) -> (Signal, f64) {
    match *self {
      SignalRule::Bands { sell_above, buy_below, floor, ceiling } => {
        if value > sell_above {
          (Signal::Sell, directional_strength(value - sell_above, ceiling - sell_above))
        } else if value < buy_below {
          (Signal::Buy, directional_strength(buy_below - value, buy_below - floor))
        } else {
          // 중립: 밴드 중앙에서 50, 경계에서 0
          let half_width = (sell_above - buy_below) / 2.0;
          let margin = (value - buy_below).min(sell_above - value);
          (Signal::Neutral, clamp(50.0 * margin / half_width, 0.0, 50.0))
        }
      }
      SignalRule::PriceVsAverage => deviation_signal(close - value, close),
      SignalRule::ZeroLine => deviation_signal(value, close),
    }
  }
}

fn directional_strength(overshoot: f64, room: f64) -> f64 {
  if room <= 0.0 {
    return 100.0;
  }
  clamp(50.0 + 50.0 * overshoot / room, 50.0, 100.0)
}

fn deviation_signal(deviation: f64, close: f64) -> (Signal, f64) {
  let signal = if deviation > 0.0 {
    Signal::Buy
  } else if deviation < 0.0 {
    Signal::Sell
  } else {
    return (Signal::Neutral, 0.0);
  };

  if close <= 0.0 {
    return (signal, 50.0);
  }
  let share = (deviation.abs() / (FULL_DEVIATION * close)).min(1.0);
  (signal, 50.0 + 50.0 * share)
}

/// Classify one indicator value. `close` is the close of the same candle.
pub fn classify(spec: &IndicatorSpec, value: f64, close: f64) -> Result<IndicatorSignal, TradingError> {
  if !value.is_finite() {
    return Err(TradingError::InvalidParameter(format!("{} value is not finite", spec.label())));
  }

  let (signal, strength) = SignalRule::for_kind(spec.kind).apply(value, close);
  Ok(IndicatorSignal::new(spec.label(), value, signal, strength))
}

/// Classify the indicator at the last candle of an annotated series.
///
/// `Ok(None)` when the series is empty or the indicator has no value yet.
pub fn classify_latest(
  spec: &IndicatorSpec,
  series: &[AnnotatedCandle],
) -> Result<Option<IndicatorSignal>, TradingError> {
  let latest = match series.last() {
    Some(latest) => latest,
    None => return Ok(None),
  };

  match latest.get(&spec.key()) {
    Some(value) => classify(spec, value, latest.candle.close).map(Some),
    None => Ok(None),
  }
}
