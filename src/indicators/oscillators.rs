/**
* filename : oscillators
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::VecDeque;

use crate::models::candle::Candle;
use crate::utils::math::{mean, mean_abs_deviation, range_position};
use super::Indicator;

/// RSI over the supplied slice.
///
/// Uses the plain mean of the last `period` gains and losses (no Wilder
/// smoothing). Needs at least `period + 1` closes; returns 100 when the
/// window has no losses.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
  if period == 0 || closes.len() < period + 1 {
    return None;
  }

  let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
  let window = &changes[changes.len() - period..];

  let avg_gain = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
  let avg_loss = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;

  Some(rsi_from_averages(avg_gain, avg_loss))
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
  if avg_loss == 0.0 {
    return 100.0;
  }

  // RSI = 100 - (100 / (1 + RS))
  let rs = avg_gain / avg_loss;
  100.0 - (100.0 / (1.0 + rs))
}

fn highest_lowest<'a>(candles: impl Iterator<Item = &'a Candle>) -> (f64, f64) {
  candles.fold((f64::MIN, f64::MAX), |(hh, ll), c| (hh.max(c.high), ll.min(c.low)))
}

/// Stochastic %K over the last `period` candles; 50 on a flat range.
pub fn stochastic_k(candles: &[Candle], period: usize) -> Option<f64> {
  let window = tail(candles, period)?;
  let close = window.last()?.close;
  let (hh, ll) = highest_lowest(window.iter());
  Some(stochastic_from_range(close, hh, ll))
}

/// Williams %R over the last `period` candles, in [-100, 0]; -50 on a flat range.
pub fn williams_r(candles: &[Candle], period: usize) -> Option<f64> {
  let window = tail(candles, period)?;
  let close = window.last()?.close;
  let (hh, ll) = highest_lowest(window.iter());
  Some(williams_from_range(close, hh, ll))
}

fn stochastic_from_range(close: f64, hh: f64, ll: f64) -> f64 {
  range_position(close, ll, hh).map_or(50.0, |p| 100.0 * p)
}

// %R = -100 * (HH - close) / (HH - LL)
fn williams_from_range(close: f64, hh: f64, ll: f64) -> f64 {
  range_position(close, ll, hh).map_or(-50.0, |p| 100.0 * (p - 1.0))
}

/// Commodity Channel Index over the last `period` typical prices; 0 when the
/// mean deviation is zero.
pub fn cci(candles: &[Candle], period: usize) -> Option<f64> {
  let window = tail(candles, period)?;
  let typical: Vec<f64> = window.iter().map(Candle::typical_price).collect();
  Some(cci_from_typical(&typical))
}

fn cci_from_typical(typical: &[f64]) -> f64 {
  let (avg, mean_dev, last) = match (mean(typical), mean_abs_deviation(typical), typical.last()) {
    (Some(avg), Some(mean_dev), Some(&last)) => (avg, mean_dev, last),
    _ => return 0.0,
  };

  if mean_dev == 0.0 {
    return 0.0;
  }
  (last - avg) / (0.015 * mean_dev)
}

fn tail<T>(items: &[T], period: usize) -> Option<&[T]> {
  if period == 0 || items.len() < period {
    return None;
  }
  Some(&items[items.len() - period..])
}

/// Streaming RSI. Keeps the last `period` gains and losses and averages them
/// on demand, so it matches `rsi` over the trailing `period + 1` closes.
#[derive(Debug)]
pub struct RelativeStrengthIndex {
  name: String,
  period: usize,
  gains: VecDeque<f64>,
  losses: VecDeque<f64>,
  prev_price: Option<f64>,
}

impl RelativeStrengthIndex {
  pub fn new(period: usize) -> Self {
    RelativeStrengthIndex {
      name: format!("RSI({})", period),
      period,
      gains: VecDeque::with_capacity(period + 1),
      losses: VecDeque::with_capacity(period + 1),
      prev_price: None,
    }
  }

  pub fn period(&self) -> usize {
    self.period
  }
}

impl Indicator for RelativeStrengthIndex {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    let price = candle.close;

    // 이전 가격과 비교하여 gain/loss 계산
    if let Some(prev_price) = self.prev_price {
      let change = price - prev_price;

      self.gains.push_back(change.max(0.0));
      self.losses.push_back((-change).max(0.0));

      // 오래된 데이터 제거
      if self.gains.len() > self.period {
        self.gains.pop_front();
        self.losses.pop_front();
      }
    }

    self.prev_price = Some(price);
  }

  fn value(&self) -> Option<f64> {
    if self.period == 0 || self.gains.len() < self.period {
      return None;
    }

    let avg_gain = self.gains.iter().sum::<f64>() / self.period as f64;
    let avg_loss = self.losses.iter().sum::<f64>() / self.period as f64;

    Some(rsi_from_averages(avg_gain, avg_loss))
  }

  fn reset(&mut self) {
    self.gains.clear();
    self.losses.clear();
    self.prev_price = None;
  }
}

/// Which range oscillator a `RangeOscillator` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
  Stochastic,
  WilliamsR,
  Cci,
}

/// Streaming Stochastic %K, Williams %R or CCI over a candle window.
#[derive(Debug)]
pub struct RangeOscillator {
  name: String,
  kind: RangeKind,
  period: usize,
  window: VecDeque<Candle>,
}

impl RangeOscillator {
  pub fn new(kind: RangeKind, period: usize) -> Self {
    let name = match kind {
      RangeKind::Stochastic => format!("Stochastic({})", period),
      RangeKind::WilliamsR => format!("Williams %R({})", period),
      RangeKind::Cci => format!("CCI({})", period),
    };

    RangeOscillator {
      name,
      kind,
      period,
      window: VecDeque::with_capacity(period + 1),
    }
  }

  pub fn stochastic(period: usize) -> Self {
    RangeOscillator::new(RangeKind::Stochastic, period)
  }

  pub fn williams_r(period: usize) -> Self {
    RangeOscillator::new(RangeKind::WilliamsR, period)
  }

  pub fn cci(period: usize) -> Self {
    RangeOscillator::new(RangeKind::Cci, period)
  }
}

impl Indicator for RangeOscillator {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    self.window.push_back(*candle);
    if self.window.len() > self.period {
      self.window.pop_front();
    }
  }

  fn value(&self) -> Option<f64> {
    if self.period == 0 || self.window.len() < self.period {
      return None;
    }

    let close = self.window.back()?.close;
    match self.kind {
      RangeKind::Stochastic => {
        let (hh, ll) = highest_lowest(self.window.iter());
        Some(stochastic_from_range(close, hh, ll))
      }
      RangeKind::WilliamsR => {
        let (hh, ll) = highest_lowest(self.window.iter());
        Some(williams_from_range(close, hh, ll))
      }
      RangeKind::Cci => {
        let typical: Vec<f64> = self.window.iter().map(Candle::typical_price).collect();
        Some(cci_from_typical(&typical))
      }
    }
  }

  fn reset(&mut self) {
    self.window.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bar(close: f64, high: f64, low: f64) -> Candle {
    Candle::new(0, close, high, low, close, 1)
  }

  #[test]
  fn test_rsi_needs_period_plus_one() {
    let closes: Vec<f64> = (0..14).map(|i| i as f64).collect();
    assert_eq!(rsi(&closes, 14), None);
    assert_eq!(rsi(&closes, 0), None);
  }

  #[test]
  fn test_rsi_all_gains_is_100() {
    let closes: Vec<f64> = (0..15).map(|i| 10.0 + i as f64).collect();
    assert_eq!(rsi(&closes, 14), Some(100.0));
  }

  #[test]
  fn test_rsi_all_losses_is_0() {
    let closes: Vec<f64> = (0..15).map(|i| 30.0 - i as f64).collect();
    assert_eq!(rsi(&closes, 14), Some(0.0));
  }

  #[test]
  fn test_rsi_uses_only_last_window() {
    // 앞쪽의 큰 하락은 마지막 3개 변화에 포함되지 않음
    let closes = vec![100.0, 50.0, 51.0, 52.0, 53.0];
    assert_eq!(rsi(&closes, 3), Some(100.0));

    // 변화: +1, -1, +2 -> avg gain 1, avg loss 1/3 -> RS 3 -> 75
    let closes = vec![10.0, 11.0, 10.0, 12.0];
    assert!((rsi(&closes, 3).unwrap() - 75.0).abs() < 1e-9);
  }

  #[test]
  fn test_streaming_rsi_matches_trailing_window() {
    let closes: Vec<f64> = (0..40).map(|i| 50.0 + ((i * 7) % 11) as f64 - 5.0).collect();
    let mut indicator = RelativeStrengthIndex::new(14);

    for (i, close) in closes.iter().enumerate() {
      indicator.update(&Candle::flat(i as i64, *close, 0));
      if i < 14 {
        assert_eq!(indicator.value(), None);
      } else {
        let expected = rsi(&closes[i - 14..=i], 14);
        assert_eq!(indicator.value(), expected);
      }
    }
  }

  #[test]
  fn test_stochastic_and_williams() {
    let candles = vec![bar(10.0, 11.0, 9.0), bar(12.0, 13.0, 10.0), bar(11.0, 12.0, 10.0)];

    // HH 13, LL 9, close 11
    assert!((stochastic_k(&candles, 3).unwrap() - 50.0).abs() < 1e-9);
    assert!((williams_r(&candles, 3).unwrap() + 50.0).abs() < 1e-9);
    assert_eq!(stochastic_k(&candles, 4), None);

    let flat = vec![bar(5.0, 5.0, 5.0); 3];
    assert_eq!(stochastic_k(&flat, 3), Some(50.0));
    assert_eq!(williams_r(&flat, 3), Some(-50.0));
  }

  #[test]
  fn test_cci() {
    let flat = vec![bar(5.0, 5.0, 5.0); 4];
    assert_eq!(cci(&flat, 4), Some(0.0));

    let candles = vec![bar(1.0, 1.0, 1.0), bar(2.0, 2.0, 2.0), bar(3.0, 3.0, 3.0)];
    // tp 1,2,3 mean 2, md 2/3 -> (3-2)/(0.015*2/3) = 100
    assert!((cci(&candles, 3).unwrap() - 100.0).abs() < 1e-9);
  }

  #[test]
  fn test_range_oscillator_streaming() {
    let candles: Vec<Candle> = (0..20)
      .map(|i| {
        let c = 100.0 + (i as f64 * 0.9).cos() * 4.0;
        bar(c, c + 1.0, c - 1.5)
      })
      .collect();

    let mut stoch = RangeOscillator::stochastic(5);
    let mut wr = RangeOscillator::williams_r(5);
    let mut cci_ind = RangeOscillator::cci(5);

    for (i, c) in candles.iter().enumerate() {
      stoch.update(c);
      wr.update(c);
      cci_ind.update(c);

      let prefix = &candles[..=i];
      assert_eq!(stoch.value(), stochastic_k(prefix, 5));
      assert_eq!(wr.value(), williams_r(prefix, 5));
      assert_eq!(cci_ind.value(), cci(prefix, 5));
    }
    assert_eq!(stoch.name(), "Stochastic(5)");
  }
}
