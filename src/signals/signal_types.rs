/**
* filename : signal_types
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
  Buy,      // 매수
  Sell,     // 매도
  Neutral,  // 중립
}

impl Signal {
  pub fn as_str(&self) -> &'static str {
    match self {
      Signal::Buy => "buy",
      Signal::Sell => "sell",
      Signal::Neutral => "neutral",
    }
  }

  pub fn is_directional(&self) -> bool {
    !matches!(self, Signal::Neutral)
  }
}

impl fmt::Display for Signal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.as_str())
  }
}

/// Classification of one indicator at the latest candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSignal {
  pub indicator_name: String,
  pub value: f64,
  pub signal: Signal,
  pub strength: f64,  // 0 ~ 100
}

impl IndicatorSignal {
  pub fn new(indicator_name: impl Into<String>, value: f64, signal: Signal, strength: f64) -> Self {
    IndicatorSignal {
      indicator_name: indicator_name.into(),
      value,
      signal,
      strength,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
  pub buy: usize,
  pub sell: usize,
  pub neutral: usize,
}

impl SignalCounts {
  pub fn tally<'a>(signals: impl IntoIterator<Item = &'a IndicatorSignal>) -> Self {
    let mut counts = SignalCounts::default();
    for s in signals {
      counts.add(s.signal);
    }
    counts
  }

  pub fn add(&mut self, signal: Signal) {
    match signal {
      Signal::Buy => self.buy += 1,
      Signal::Sell => self.sell += 1,
      Signal::Neutral => self.neutral += 1,
    }
  }

  pub fn get(&self, signal: Signal) -> usize {
    match signal {
      Signal::Buy => self.buy,
      Signal::Sell => self.sell,
      Signal::Neutral => self.neutral,
    }
  }

  pub fn total(&self) -> usize {
    self.buy + self.sell + self.neutral
  }
}

/// Rollup of all indicator signals at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateAnalysis {
  pub overall: Signal,
  pub strength: f64,  // 50 ~ 100
  pub counts: SignalCounts,
}
