//! 주기 갱신 / 실시간 틱 반영 테스트

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use tradedesk_ta::analysis::AnalysisEngine;
use tradedesk_ta::indicators::IndicatorSpec;
use tradedesk_ta::market_data::{CandleSeries, MockCandleSource, TickStream};
use tradedesk_ta::models::{Candle, CandleRequest, HistoryPeriod, Tick, Timeframe};
use tradedesk_ta::signals::Signal;

const MINUTE: i64 = 60_000;

fn engine() -> Arc<AnalysisEngine> {
  let source = MockCandleSource::new(3).with_end(1_700_000_000_000);
  Arc::new(AnalysisEngine::new(Arc::new(source), IndicatorSpec::chart_defaults()).unwrap())
}

#[tokio::test]
async fn test_refresh_publishes_snapshots() {
  let request = CandleRequest::new("ETHUSD", Timeframe::OneHour, HistoryPeriod::OneWeek);
  let (mut rx, handle) = engine().spawn_refresh(request, Duration::from_millis(20));

  for _ in 0..2 {
    tokio::time::timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    let snapshot = rx.borrow_and_update().clone().unwrap();
    assert_eq!(snapshot.symbol, "ETHUSD");
    assert_eq!(snapshot.candles.len(), 168);
  }

  // 수신자가 모두 사라지면 루프 종료
  drop(rx);
  tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_refresh_failure_keeps_previous_snapshot() {
  // 빈 심볼은 모의 소스에서 실패
  let request = CandleRequest::new("", Timeframe::OneHour, HistoryPeriod::OneWeek);
  let (rx, handle) = engine().spawn_refresh(request, Duration::from_millis(10));

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(rx.borrow().is_none());
  handle.abort();
}

#[tokio::test]
async fn test_follow_ticks_updates_series() {
  let mut series = CandleSeries::new("BTCUSD", Timeframe::OneMinute);
  let history: Vec<Candle> = (0..20)
    .map(|i| {
      let close = 43_000.0 + i as f64 * 10.0;
      Candle::new(i * MINUTE, close - 5.0, close + 5.0, close - 10.0, close, 3)
    })
    .collect();
  series.replace(history).unwrap();

  let mut stream = TickStream::new(64);
  stream.get_or_create_channel("BTCUSD");
  let ticks = stream.get_receiver("BTCUSD").unwrap();
  let (tx, mut rx) = watch::channel(None);

  let follower = tokio::spawn(engine().follow_ticks(series, ticks, tx));

  // 같은 봉 갱신, 잘못된 틱은 발행 단계에서 거부, 다음 봉 생성
  stream.publish(Tick::new("btcusd", 19 * MINUTE + 30_000, 43_200.0, 1)).unwrap();
  assert!(stream.publish(Tick::new("BTCUSD", 19 * MINUTE + 40_000, -1.0, 1)).is_err());
  stream.publish(Tick::new("BTCUSD", 20 * MINUTE + 1_000, 43_210.0, 2)).unwrap();

  let mut last_len = 0;
  while last_len < 21 {
    tokio::time::timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    let snapshot = rx.borrow_and_update().clone().unwrap();
    last_len = snapshot.candles.len();
    let rsi = snapshot.signals.iter().find(|s| s.indicator_name == "RSI(14)").unwrap();
    assert_eq!(rsi.signal, Signal::Sell);
  }

  // 채널 종료 -> 최종 시리즈 반환
  drop(stream);
  let series = tokio::time::timeout(Duration::from_secs(5), follower).await.unwrap().unwrap();
  assert_eq!(series.len(), 21);
  assert_eq!(series.candles()[19].close, 43_200.0);
  assert_eq!(series.candles()[19].high, 43_200.0);
  assert_eq!(series.last().unwrap().close, 43_210.0);
}
