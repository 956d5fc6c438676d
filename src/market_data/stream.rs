use std::collections::HashMap;

use tokio::sync::broadcast;

use crate::models::candle::Tick;
use crate::error::TradingError;

/// 실시간 틱 스트림 (심볼별 브로드캐스트 채널)
///
/// Symbols are matched case-insensitively. A tick is only published if its
/// price is a positive finite number and it is not older than the latest
/// tick already seen for that symbol.
pub struct TickStream {
    channels: HashMap<String, broadcast::Sender<Tick>>,
    latest_ticks: HashMap<String, Tick>,
    buffer_size: usize,
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

impl TickStream {
    pub fn new(buffer_size: usize) -> Self {
        TickStream {
            channels: HashMap::new(),
            latest_ticks: HashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// 심볼 채널 생성 또는 가져오기
    pub fn get_or_create_channel(&mut self, symbol: &str) -> broadcast::Sender<Tick> {
        let buffer_size = self.buffer_size;
        self.channels
            .entry(normalize(symbol))
            .or_insert_with(|| broadcast::channel(buffer_size).0)
            .clone()
    }

    /// 틱 검사 후 브로드캐스트. 심볼은 대문자로 정규화됨
    pub fn publish(&mut self, mut tick: Tick) -> Result<(), TradingError> {
        tick.symbol = normalize(&tick.symbol);
        if tick.symbol.is_empty() {
            return Err(TradingError::InvalidParameter("tick symbol must not be empty".to_string()));
        }
        if !tick.price.is_finite() || tick.price <= 0.0 {
            return Err(TradingError::InvalidParameter(format!(
                "{} tick price must be positive, got {}",
                tick.symbol, tick.price
            )));
        }
        if let Some(latest) = self.latest_ticks.get(&tick.symbol) {
            if tick.timestamp < latest.timestamp {
                return Err(TradingError::InvalidParameter(format!(
                    "{} tick at {} is older than latest {}",
                    tick.symbol, tick.timestamp, latest.timestamp
                )));
            }
        }

        // 최신 틱 업데이트
        self.latest_ticks.insert(tick.symbol.clone(), tick.clone());

        // 채널에 데이터 전송 (수신자가 없어도 오류 아님)
        match self.channels.get(&tick.symbol) {
            Some(sender) => {
                let _ = sender.send(tick);
                Ok(())
            }
            None => Err(TradingError::ChannelNotFound(tick.symbol)),
        }
    }

    /// 최신 틱 조회
    pub fn get_latest(&self, symbol: &str) -> Option<Tick> {
        self.latest_ticks.get(&normalize(symbol)).cloned()
    }

    /// 수신기 얻기
    pub fn get_receiver(&self, symbol: &str) -> Result<broadcast::Receiver<Tick>, TradingError> {
        self.channels
            .get(&normalize(symbol))
            .map(broadcast::Sender::subscribe)
            .ok_or_else(|| TradingError::ChannelNotFound(symbol.to_string()))
    }

    pub fn symbols(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }
}
