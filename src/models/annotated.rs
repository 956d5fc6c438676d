/**
* filename : annotated
* author : HAMA
* date: 2025. 5. 11.
* description: 지표 값이 붙은 캔들
**/

use std::collections::BTreeMap;

use serde::Serialize;

use super::candle::Candle;

/// A candle plus the indicator values computed at its index.
///
/// Keys are indicator field names (`sma20`, `ema12`, `rsi14`, ...). A `None`
/// value means the series had not yet reached that indicator's lookback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedCandle {
    #[serde(flatten)]
    pub candle: Candle,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

impl AnnotatedCandle {
    pub fn new(candle: Candle) -> Self {
        AnnotatedCandle {
            candle,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    pub fn set(&mut self, key: impl Into<String>, value: Option<f64>) {
        self.values.insert(key.into(), value);
    }
}
