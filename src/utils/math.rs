//! 수학 관련 유틸리티
//!
//! 지표 계산과 신호 강도에 쓰는 작은 수치 함수

/// 값을 범위 내로 제한
pub fn clamp<T: PartialOrd>(value: T, min_value: T, max_value: T) -> T {
  if value < min_value {
    min_value
  } else if value > max_value {
    max_value
  } else {
    value
  }
}

/// 산술 평균
pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }

  Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 평균 절대 편차
pub fn mean_abs_deviation(values: &[f64]) -> Option<f64> {
  let avg = mean(values)?;
  Some(values.iter().map(|v| (v - avg).abs()).sum::<f64>() / values.len() as f64)
}

/// `value`가 [low, high] 구간의 어디쯤인지 (0 = low, 1 = high). 폭이 0이면 None
pub fn range_position(value: f64, low: f64, high: f64) -> Option<f64> {
  if high <= low {
    return None;
  }
  Some((value - low) / (high - low))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clamp() {
    assert_eq!(clamp(5, 0, 10), 5);
    assert_eq!(clamp(-5, 0, 10), 0);
    assert_eq!(clamp(15, 0, 10), 10);
    assert_eq!(clamp(120.0, 50.0, 100.0), 100.0);
  }

  #[test]
  fn test_mean_and_deviation() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    assert!((mean_abs_deviation(&[1.0, 2.0, 3.0]).unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(mean_abs_deviation(&[4.0, 4.0]), Some(0.0));
  }

  #[test]
  fn test_range_position() {
    assert_eq!(range_position(11.0, 9.0, 13.0), Some(0.5));
    assert_eq!(range_position(9.0, 9.0, 13.0), Some(0.0));
    assert_eq!(range_position(5.0, 5.0, 5.0), None);
  }
}
