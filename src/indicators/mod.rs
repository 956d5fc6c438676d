/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/
pub mod moving_averages;
pub mod oscillators;
pub mod spec;
pub mod trend;

pub use moving_averages::*;
pub use oscillators::*;
pub use spec::*;
pub use trend::*;

use std::fmt::Debug;

use crate::models::candle::Candle;

/// Streaming form of an indicator: fed one candle at a time, oldest first.
pub trait Indicator: Debug + Send + Sync {
  fn name(&self) -> &str;

  // 새로운 캔들로 지표 업데이트
  fn update(&mut self, candle: &Candle);

  // 현재 지표 값 (룩백이 부족하면 None)
  fn value(&self) -> Option<f64>;

  // 지표가 계산 가능한지 (충분한 데이터가 있는지) 확인
  fn is_ready(&self) -> bool {
    self.value().is_some()
  }

  // 지표 상태 리셋
  fn reset(&mut self);
}

// 여러 지표를 한 캔들로 업데이트
pub fn update_indicators(indicators: &mut [Box<dyn Indicator>], candle: &Candle) {
  for indicator in indicators.iter_mut() {
    indicator.update(candle);
  }
}

