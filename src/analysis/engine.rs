/**
* filename : engine
* author : HAMA
* date: 2025. 5. 12.
* description: 캔들 조회 -> 지표 계산 -> 신호 분류 -> 종합
**/

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::analysis::annotator::Annotator;
use crate::error::TradingError;
use crate::indicators::IndicatorSpec;
use crate::market_data::series::CandleSeries;
use crate::market_data::source::CandleSource;
use crate::models::annotated::AnnotatedCandle;
use crate::models::candle::{Candle, Tick};
use crate::models::timeframe::{CandleRequest, Timeframe};
use crate::signals::aggregate::aggregate;
use crate::signals::classifier::classify_latest;
use crate::signals::signal_types::{AggregateAnalysis, IndicatorSignal};
use crate::utils::{current_timestamp_ms, logging};

/// Latest snapshot published by the refresh / tick loops.
pub type Snapshot = Option<Arc<AnalysisReport>>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
  pub symbol: String,
  pub timeframe: Timeframe,
  pub generated_at: i64,
  pub candles: Vec<AnnotatedCandle>,
  pub signals: Vec<IndicatorSignal>,
  /// Indicators with no value at the latest candle, or whose value failed to classify.
  pub skipped: Vec<String>,
  pub aggregate: AggregateAnalysis,
}

impl AnalysisReport {
  pub fn summary(&self) -> AnalysisSummary {
    AnalysisSummary {
      symbol: self.symbol.clone(),
      timeframe: self.timeframe,
      generated_at: self.generated_at,
      last_close: self.candles.last().map(|c| c.candle.close),
      signals: self.signals.clone(),
      skipped: self.skipped.clone(),
      aggregate: self.aggregate,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
  pub symbol: String,
  pub timeframe: Timeframe,
  pub generated_at: i64,
  pub last_close: Option<f64>,
  pub signals: Vec<IndicatorSignal>,
  pub skipped: Vec<String>,
  pub aggregate: AggregateAnalysis,
}

pub struct AnalysisEngine {
  source: Arc<dyn CandleSource>,
  annotator: Annotator,
}

impl AnalysisEngine {
  pub fn new(source: Arc<dyn CandleSource>, specs: Vec<IndicatorSpec>) -> Result<Self, TradingError> {
    Ok(AnalysisEngine {
      source,
      annotator: Annotator::new(specs)?,
    })
  }

  pub fn source_name(&self) -> &str {
    self.source.name()
  }

  pub fn specs(&self) -> &[IndicatorSpec] {
    self.annotator.specs()
  }

  /// Annotate, classify the latest candle per indicator, then aggregate.
  ///
  /// Fails only on a malformed series. A single indicator that cannot be
  /// classified is logged and listed in `skipped`.
  pub fn analyze(&self, symbol: &str, timeframe: Timeframe, candles: &[Candle]) -> Result<AnalysisReport, TradingError> {
    let annotated = self.annotator.annotate(candles)?;

    let mut signals = Vec::with_capacity(self.specs().len());
    let mut skipped = Vec::new();

    for spec in self.specs() {
      match classify_latest(spec, &annotated) {
        Ok(Some(signal)) => signals.push(signal),
        Ok(None) => {
          log::debug!(
            "{} - {} 값 없음: 캔들 {}개 필요, 현재 {}개",
            symbol,
            spec.label(),
            spec.first_index() + 1,
            annotated.len()
          );
          skipped.push(spec.label());
        }
        Err(e) => {
          logging::log_error(&format!("{} {}", symbol, spec.label()), &e);
          skipped.push(spec.label());
        }
      }
    }

    let aggregate = aggregate(&signals);

    Ok(AnalysisReport {
      symbol: symbol.to_string(),
      timeframe,
      generated_at: current_timestamp_ms(),
      candles: annotated,
      signals,
      skipped,
      aggregate,
    })
  }

  pub async fn run(&self, request: &CandleRequest) -> Result<AnalysisReport, TradingError> {
    logging::log_analysis_start(self.source.name(), &request.symbol, request.timeframe.as_str());

    let candles = self.source.fetch_candles(request).await.map_err(|e| {
      logging::log_error(&format!("{} 캔들 조회", request.symbol), &e);
      e
    })?;

    let report = self.analyze(&request.symbol, request.timeframe, &candles)?;
    logging::log_analysis_end(&request.symbol, report.candles.len(), &report.aggregate);
    Ok(report)
  }

  /// Each request succeeds or fails on its own; results keep request order.
  pub async fn run_many(&self, requests: &[CandleRequest]) -> Vec<Result<AnalysisReport, TradingError>> {
    join_all(requests.iter().map(|request| self.run(request))).await
  }

  /// Refetch and re-analyze every `every` until all receivers are gone.
  ///
  /// A failed refresh keeps the previous snapshot in the channel.
  pub fn spawn_refresh(
    self: Arc<Self>,
    request: CandleRequest,
    every: Duration,
  ) -> (watch::Receiver<Snapshot>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(None);

    let handle = tokio::spawn(async move {
      let mut ticker = tokio::time::interval(every);
      loop {
        ticker.tick().await;
        if tx.is_closed() {
          break;
        }

        match self.run(&request).await {
          Ok(report) => {
            if tx.send(Some(Arc::new(report))).is_err() {
              break;
            }
          }
          Err(e) => log::warn!("{} 갱신 실패, 이전 결과 유지: {}", request.symbol, e),
        }
      }
      log::debug!("{} 갱신 루프 종료", request.symbol);
    });

    (rx, handle)
  }

  /// Apply incoming ticks to `series` and publish a fresh analysis after each one.
  ///
  /// Ticks for other symbols and ticks the series rejects are dropped. Returns
  /// the final series once the tick channel closes or every receiver is gone.
  pub async fn follow_ticks(
    self: Arc<Self>,
    mut series: CandleSeries,
    mut ticks: broadcast::Receiver<Tick>,
    tx: watch::Sender<Snapshot>,
  ) -> CandleSeries {
    loop {
      let tick = match ticks.recv().await {
        Ok(tick) => tick,
        Err(broadcast::error::RecvError::Lagged(n)) => {
          log::warn!("{} 틱 {}개 유실", series.symbol(), n);
          continue;
        }
        Err(broadcast::error::RecvError::Closed) => break,
      };

      if !tick.symbol.eq_ignore_ascii_case(series.symbol()) {
        continue;
      }
      if let Err(e) = series.apply_tick(&tick) {
        logging::log_error(&format!("{} 틱 반영", series.symbol()), &e);
        continue;
      }

      match self.analyze(series.symbol(), series.timeframe(), series.candles()) {
        Ok(report) => {
          if tx.send(Some(Arc::new(report))).is_err() {
            break;
          }
        }
        Err(e) => logging::log_error(&format!("{} 분석", series.symbol()), &e),
      }
    }

    series
  }
}
