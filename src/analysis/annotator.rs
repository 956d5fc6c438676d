/**
* filename : annotator
* author : HAMA
* date: 2025. 5. 11.
* description: 캔들 시리즈에 지표 값을 붙이는 단일 패스 변환
**/

use crate::error::TradingError;
use crate::indicators::{update_indicators, Indicator, IndicatorSpec};
use crate::models::annotated::AnnotatedCandle;
use crate::models::candle::{validate_series, Candle};

#[derive(Debug, Clone)]
pub struct Annotator {
  specs: Vec<IndicatorSpec>,
}

impl Annotator {
  /// Fails on the first invalid spec.
  pub fn new(specs: Vec<IndicatorSpec>) -> Result<Self, TradingError> {
    for spec in &specs {
      spec.validate()?;
    }
    Ok(Annotator { specs })
  }

  pub fn specs(&self) -> &[IndicatorSpec] {
    &self.specs
  }

  /// Validates the series, then walks it once, feeding every indicator each
  /// candle in order. Values at index `i` only see candles `0..=i`.
  pub fn annotate(&self, candles: &[Candle]) -> Result<Vec<AnnotatedCandle>, TradingError> {
    validate_series(candles)?;

    let mut indicators: Vec<Box<dyn Indicator>> = self
      .specs
      .iter()
      .map(IndicatorSpec::build)
      .collect::<Result<_, _>>()?;
    let keys: Vec<String> = self.specs.iter().map(IndicatorSpec::key).collect();

    let mut out = Vec::with_capacity(candles.len());
    for candle in candles {
      update_indicators(&mut indicators, candle);

      let mut annotated = AnnotatedCandle::new(*candle);
      for (key, indicator) in keys.iter().zip(indicators.iter()) {
        annotated.set(key.clone(), indicator.value());
      }
      out.push(annotated);
    }

    Ok(out)
  }
}

/// One-shot helper.
pub fn annotate(candles: &[Candle], specs: &[IndicatorSpec]) -> Result<Vec<AnnotatedCandle>, TradingError> {
  Annotator::new(specs.to_vec())?.annotate(candles)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::indicators::{ema, rsi, sma};

  fn rising_series(n: usize) -> Vec<Candle> {
    (0..n)
      .map(|i| {
        let close = 1.0 + i as f64 * 0.0001;
        Candle::new(i as i64 * 3_600_000, close, close + 0.0002, close - 0.0002, close, 1000)
      })
      .collect()
  }

  #[test]
  fn test_lookback_gates() {
    let candles = rising_series(25);
    let annotated = annotate(&candles, &IndicatorSpec::chart_defaults()).unwrap();

    assert_eq!(annotated.len(), 25);
    for (i, a) in annotated.iter().enumerate() {
      assert_eq!(a.get("sma20").is_some(), i >= 19, "sma20 at {}", i);
      assert_eq!(a.get("ema12").is_some(), i >= 11, "ema12 at {}", i);
      assert_eq!(a.get("rsi14").is_some(), i >= 14, "rsi14 at {}", i);
      // 룩백 부족 구간에도 키는 존재 (null)
      assert!(a.values.contains_key("sma20"));
    }
  }

  #[test]
  fn test_first_value_at_first_index() {
    let candles = rising_series(50);
    let specs = IndicatorSpec::panel_defaults();
    let annotated = annotate(&candles, &specs).unwrap();

    for spec in &specs {
      let first = annotated.iter().position(|a| a.get(&spec.key()).is_some());
      assert_eq!(first, Some(spec.first_index()), "{}", spec);
    }
  }

  #[test]
  fn test_matches_pure_functions() {
    let candles: Vec<Candle> = (0..60)
      .map(|i| {
        let close = 50.0 + (i as f64 * 0.5).sin() * 2.0;
        Candle::new(i as i64, close, close + 0.3, close - 0.3, close, 10)
      })
      .collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let annotated = annotate(&candles, &IndicatorSpec::chart_defaults()).unwrap();
    let sma20 = sma(&closes, 20);
    let ema12 = ema(&closes, 12);

    for i in 0..candles.len() {
      match (annotated[i].get("sma20"), sma20[i]) {
        (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9),
        (None, None) => {}
        other => panic!("sma mismatch at {}: {:?}", i, other),
      }
      if i >= 11 {
        assert_eq!(annotated[i].get("ema12"), Some(ema12[i]));
      }
      if i >= 14 {
        assert_eq!(annotated[i].get("rsi14"), rsi(&closes[i - 14..=i], 14));
      }
    }
  }

  #[test]
  fn test_no_lookahead() {
    let candles = rising_series(30);
    let full = annotate(&candles, &IndicatorSpec::panel_defaults()).unwrap();
    let prefix = annotate(&candles[..22], &IndicatorSpec::panel_defaults()).unwrap();

    assert_eq!(&full[..22], &prefix[..]);
  }

  #[test]
  fn test_rejects_malformed_batch() {
    let mut candles = rising_series(5);
    candles[3].timestamp = candles[1].timestamp;

    let err = annotate(&candles, &IndicatorSpec::chart_defaults()).unwrap_err();
    assert!(matches!(err, TradingError::Validation { index: 3, .. }));
  }

  #[test]
  fn test_rejects_invalid_spec() {
    assert!(Annotator::new(vec![IndicatorSpec::sma(0)]).is_err());
  }

  #[test]
  fn test_empty_series() {
    assert!(annotate(&[], &IndicatorSpec::chart_defaults()).unwrap().is_empty());
  }
}
