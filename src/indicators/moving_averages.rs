/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::VecDeque;

use crate::models::candle::Candle;
use super::Indicator;

/// SMA at every index; `None` while `i < period - 1`.
pub fn sma(closes: &[f64], period: usize) -> Vec<Option<f64>> {
  let mut out = Vec::with_capacity(closes.len());
  if period == 0 {
    out.resize(closes.len(), None);
    return out;
  }

  let mut sum = 0.0;
  for (i, close) in closes.iter().enumerate() {
    sum += close;
    if i >= period {
      sum -= closes[i - period];
    }

    if i + 1 >= period {
      out.push(Some(sum / period as f64));
    } else {
      out.push(None);
    }
  }

  out
}

/// SMA of the `period` closes ending at `index`.
pub fn sma_at(closes: &[f64], index: usize, period: usize) -> Option<f64> {
  if period == 0 || index >= closes.len() || index + 1 < period {
    return None;
  }

  let window = &closes[index + 1 - period..=index];
  Some(window.iter().sum::<f64>() / period as f64)
}

/// Raw EMA recurrence seeded with the first close.
///
/// `ema[0] == closes[0]` (no SMA warm-up), `ema[i] = close * k + ema[i-1] * (1 - k)`
/// with `k = 2 / (period + 1)`. Defined from index 0.
pub fn ema(closes: &[f64], period: usize) -> Vec<f64> {
  let mut out = Vec::with_capacity(closes.len());
  let k = ema_multiplier(period);

  for (i, close) in closes.iter().enumerate() {
    if i == 0 {
      out.push(*close);
    } else {
      let prev = out[i - 1];
      out.push(close * k + prev * (1.0 - k));
    }
  }

  out
}

/// `ema` with the lookback gate applied: `None` while `i < period - 1`.
pub fn ema_gated(closes: &[f64], period: usize) -> Vec<Option<f64>> {
  ema(closes, period)
    .into_iter()
    .enumerate()
    .map(|(i, v)| if period > 0 && i + 1 >= period { Some(v) } else { None })
    .collect()
}

pub fn ema_multiplier(period: usize) -> f64 {
  2.0 / (period as f64 + 1.0)
}

#[derive(Debug)]
pub struct SimpleMovingAverage {
  name: String,
  period: usize,
  values: VecDeque<f64>,
  sum: f64,
}

impl SimpleMovingAverage {
  pub fn new(period: usize) -> Self {
    SimpleMovingAverage {
      name: format!("SMA({})", period),
      period,
      values: VecDeque::with_capacity(period),
      sum: 0.0,
    }
  }

  pub fn period(&self) -> usize {
    self.period
  }

  pub fn update_price(&mut self, price: f64) {
    // 새 가격 추가
    self.values.push_back(price);
    self.sum += price;

    // 오래된 가격 제거 (필요시)
    if self.values.len() > self.period {
      if let Some(old_value) = self.values.pop_front() {
        self.sum -= old_value;
      }
    }
  }

  pub fn current(&self) -> Option<f64> {
    if self.period == 0 || self.values.len() < self.period {
      return None;
    }
    Some(self.sum / self.period as f64)
  }
}

impl Indicator for SimpleMovingAverage {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    self.update_price(candle.close);
  }

  fn value(&self) -> Option<f64> {
    self.current()
  }

  fn reset(&mut self) {
    self.values.clear();
    self.sum = 0.0;
  }
}

/// Streaming raw EMA. `value` is gated on `period` observations, `raw` is not.
#[derive(Debug)]
pub struct ExponentialMovingAverage {
  name: String,
  period: usize,
  current_ema: Option<f64>,
  alpha: f64,
  count: usize,
}

impl ExponentialMovingAverage {
  pub fn new(period: usize) -> Self {
    ExponentialMovingAverage {
      name: format!("EMA({})", period),
      period,
      current_ema: None,
      alpha: ema_multiplier(period),
      count: 0,
    }
  }

  pub fn period(&self) -> usize {
    self.period
  }

  pub fn update_price(&mut self, price: f64) {
    self.count += 1;

    // 첫 값은 첫 종가 그대로
    self.current_ema = Some(match self.current_ema {
      Some(prev) => price * self.alpha + prev * (1.0 - self.alpha),
      None => price,
    });
  }

  pub fn raw(&self) -> Option<f64> {
    self.current_ema
  }

  pub fn count(&self) -> usize {
    self.count
  }
}

impl Indicator for ExponentialMovingAverage {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, candle: &Candle) {
    self.update_price(candle.close);
  }

  fn value(&self) -> Option<f64> {
    if self.period == 0 || self.count < self.period {
      return None;
    }
    self.current_ema
  }

  fn reset(&mut self) {
    self.current_ema = None;
    self.count = 0;
  }
}
