/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::VecDeque;

use statrs::statistics::Statistics;

use crate::models::candle::Candle;
use super::moving_averages::{ema, ExponentialMovingAverage};
use super::Indicator;

/// Band width of Bollinger %B, in standard deviations.
pub const BOLLINGER_K: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
  pub macd: f64,
  pub signal: f64,
  pub histogram: f64,
}

/// MACD using the raw EMA recurrence for both lines.
///
/// The MACD line counts from index `slow - 1`; the signal line is the raw EMA
/// of that line starting there, so a point exists from `slow - 1 + signal - 1`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<Option<MacdPoint>> {
  let mut out = vec![None; closes.len()];
  if fast == 0 || slow == 0 || signal == 0 || closes.len() < slow {
    return out;
  }

  let fast_ema = ema(closes, fast);
  let slow_ema = ema(closes, slow);
  let start = slow - 1;

  let line: Vec<f64> = (start..closes.len()).map(|i| fast_ema[i] - slow_ema[i]).collect();
  let signal_line = ema(&line, signal);

  for (offset, (m, s)) in line.iter().zip(signal_line.iter()).enumerate() {
    if offset + 1 >= signal {
      out[start + offset] = Some(MacdPoint {
        macd: *m,
        signal: *s,
        histogram: m - s,
      });
    }
  }

  out
}

/// Bollinger %B of the last close against SMA ± k·σ (population σ) of the
/// last `period` closes; 0.5 when σ is zero.
pub fn percent_b(closes: &[f64], period: usize, k: f64) -> Option<f64> {
  if period == 0 || closes.len() < period {
    return None;
  }

  let window = &closes[closes.len() - period..];
  Some(percent_b_of(window, k))
}

fn percent_b_of<'a, I>(window: I, k: f64) -> f64
where
  I: IntoIterator<Item = &'a f64> + Clone,
{
  let mean = window.clone().into_iter().mean();
  let std_dev = window.clone().into_iter().population_std_dev();
  let last = window.into_iter().last().copied().unwrap_or(mean);

  if std_dev == 0.0 || std_dev.is_nan() {
    return 0.5;
  }

  let upper = mean + k * std_dev;
  let lower = mean - k * std_dev;
  (last - lower) / (upper - lower)
}

/// Streaming MACD; `value` is the histogram.
#[derive(Debug)]
pub struct MACD {
  name: String,
  slow_period: usize,
  signal_period: usize,
  fast_ema: ExponentialMovingAverage,
  slow_ema: ExponentialMovingAverage,
  signal_ema: ExponentialMovingAverage,
  last: Option<MacdPoint>,
}

impl MACD {
  pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
    MACD {
      name: format!("MACD({},{},{})", fast_period, slow_period, signal_period),
      slow_period,
      signal_period,
      fast_ema: ExponentialMovingAverage::new(fast_period),
      slow_ema: ExponentialMovingAverage::new(slow_period),
      signal_ema: ExponentialMovingAverage::new(signal_period),
      last: None,
    }
  }

  pub fn point(&self) -> Option<MacdPoint> {
    self.last
  }
}

impl Indicator for MACD {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    // 빠른 EMA와 느린 EMA 업데이트
    self.fast_ema.update_price(candle.close);
    self.slow_ema.update_price(candle.close);

    if self.slow_period == 0 || self.slow_ema.count() < self.slow_period {
      return;
    }

    // 두 EMA가 준비되면 MACD 라인 계산하고 시그널 EMA 업데이트
    if let (Some(fast), Some(slow)) = (self.fast_ema.raw(), self.slow_ema.raw()) {
      let macd_line = fast - slow;
      self.signal_ema.update_price(macd_line);

      if self.signal_period > 0 && self.signal_ema.count() >= self.signal_period {
        if let Some(signal) = self.signal_ema.raw() {
          self.last = Some(MacdPoint {
            macd: macd_line,
            signal,
            histogram: macd_line - signal,
          });
        }
      }
    }
  }

  fn value(&self) -> Option<f64> {
    self.last.map(|p| p.histogram)
  }

  fn reset(&mut self) {
    self.fast_ema.reset();
    self.slow_ema.reset();
    self.signal_ema.reset();
    self.last = None;
  }
}

/// Streaming Bollinger %B.
#[derive(Debug)]
pub struct BollingerPercentB {
  name: String,
  period: usize,
  k: f64,
  closes: VecDeque<f64>,
}

impl BollingerPercentB {
  pub fn new(period: usize, k: f64) -> Self {
    BollingerPercentB {
      name: format!("Bollinger %B({})", period),
      period,
      k,
      closes: VecDeque::with_capacity(period + 1),
    }
  }
}

impl Indicator for BollingerPercentB {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    self.closes.push_back(candle.close);
    if self.closes.len() > self.period {
      self.closes.pop_front();
    }
  }

  fn value(&self) -> Option<f64> {
    if self.period == 0 || self.closes.len() < self.period {
      return None;
    }
    Some(percent_b_of(&self.closes, self.k))
  }

  fn reset(&mut self) {
    self.closes.clear();
  }
}
