/**
* filename : aggregate
* author : HAMA
* date: 2025. 5. 11.
* description: 지표별 신호 투표 집계
**/

use super::signal_types::{AggregateAnalysis, IndicatorSignal, Signal, SignalCounts};

/// Neutral strength, also used for ties and for an empty indicator list.
pub const BASE_STRENGTH: f64 = 50.0;

pub fn aggregate(signals: &[IndicatorSignal]) -> AggregateAnalysis {
  aggregate_counts(SignalCounts::tally(signals))
}

/// Plurality vote over buy / sell / neutral.
///
/// A tie for first place resolves to neutral. A directional winner gets
/// `50 + share * 50`; neutral always reports 50.
pub fn aggregate_counts(counts: SignalCounts) -> AggregateAnalysis {
  let total = counts.total();
  let overall = winner(&counts);

  let strength = if total == 0 || !overall.is_directional() {
    BASE_STRENGTH
  } else {
    BASE_STRENGTH + (counts.get(overall) as f64 / total as f64) * 50.0
  };

  AggregateAnalysis {
    overall,
    strength,
    counts,
  }
}

fn winner(counts: &SignalCounts) -> Signal {
  let candidates = [Signal::Buy, Signal::Sell, Signal::Neutral];
  let top = candidates.iter().map(|s| counts.get(*s)).max().unwrap_or(0);

  let mut leaders = candidates.iter().filter(|s| counts.get(**s) == top);
  match (leaders.next(), leaders.next()) {
    (Some(only), None) if top > 0 => *only,
    _ => Signal::Neutral,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn counts(buy: usize, sell: usize, neutral: usize) -> SignalCounts {
    SignalCounts { buy, sell, neutral }
  }

  #[test]
  fn test_tie_is_neutral() {
    let result = aggregate_counts(counts(2, 2, 0));
    assert_eq!(result.overall, Signal::Neutral);
    assert_eq!(result.strength, 50.0);
  }

  #[test]
  fn test_majority_scaling() {
    let result = aggregate_counts(counts(6, 1, 1));
    assert_eq!(result.overall, Signal::Buy);
    assert_eq!(result.strength, 87.5);
    assert_eq!(result.counts.total(), 8);
  }

  #[test]
  fn test_sell_majority() {
    let result = aggregate_counts(counts(1, 3, 0));
    assert_eq!(result.overall, Signal::Sell);
    assert_eq!(result.strength, 87.5);
  }

  #[test]
  fn test_neutral_plurality() {
    let result = aggregate_counts(counts(1, 0, 3));
    assert_eq!(result.overall, Signal::Neutral);
    assert_eq!(result.strength, 50.0);
  }

  #[test]
  fn test_directional_tied_with_neutral() {
    let result = aggregate_counts(counts(2, 0, 2));
    assert_eq!(result.overall, Signal::Neutral);
    assert_eq!(result.strength, 50.0);
  }

  #[test]
  fn test_empty() {
    let result = aggregate(&[]);
    assert_eq!(result.overall, Signal::Neutral);
    assert_eq!(result.strength, 50.0);
    assert_eq!(result.counts, SignalCounts::default());
  }

  #[test]
  fn test_aggregate_from_signals() {
    let signals = vec![
      IndicatorSignal::new("RSI(14)", 100.0, Signal::Sell, 100.0),
      IndicatorSignal::new("CCI(20)", 150.0, Signal::Sell, 62.5),
      IndicatorSignal::new("Stochastic(14)", 50.0, Signal::Neutral, 50.0),
    ];
    let result = aggregate(&signals);

    assert_eq!(result.counts, counts(0, 2, 1));
    assert_eq!(result.overall, Signal::Sell);
    assert!((result.strength - (50.0 + 2.0 / 3.0 * 50.0)).abs() < 1e-12);
  }
}
