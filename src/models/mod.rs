pub mod annotated;
pub mod candle;
pub mod timeframe;

pub use annotated::AnnotatedCandle;
pub use candle::{validate_series, Candle, Tick};
pub use timeframe::{CandleRequest, HistoryPeriod, Timeframe};
