/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tradedesk_ta::analysis::engine::{AnalysisEngine, AnalysisReport};
use tradedesk_ta::config::Config;
use tradedesk_ta::http::{build_router, AppState};
use tradedesk_ta::market_data::build_source;
use tradedesk_ta::models::timeframe::{CandleRequest, HistoryPeriod, Timeframe};
use tradedesk_ta::utils::{format_timestamp, logging};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let (config, ignored) = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("기술적 분석 엔진 시작 (v{})", tradedesk_ta::VERSION);
    for entry in &ignored {
        log::warn!("환경 변수 무시: {}", entry);
    }

    let source = build_source(&config.source)?;
    let engine = Arc::new(AnalysisEngine::new(source, config.analysis.indicators.clone())?);
    log::info!("분석 엔진 초기화 완료: 소스 = {}, 지표 {}개", engine.source_name(), engine.specs().len());

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("serve") => run_server(config, engine).await?,
        Some("watch") => run_watch(config, engine).await?,
        Some("analyze") => run_analyze(&config, engine, &args[2..]).await?,
        _ => run_analyze(&config, engine, args.get(1..).unwrap_or(&[])).await?,
    }

    Ok(())
}

/// `analyze [SYMBOL] [INTERVAL] [PERIOD]`, without a symbol every configured symbol
async fn run_analyze(config: &Config, engine: Arc<AnalysisEngine>, args: &[String]) -> Result<(), anyhow::Error> {
    let timeframe = match args.get(1) {
        Some(s) => Timeframe::from_str(s)?,
        None => config.analysis.timeframe,
    };
    let period = match args.get(2) {
        Some(s) => HistoryPeriod::from_str(s)?,
        None => config.analysis.period,
    };

    let symbols: Vec<String> = match args.first() {
        Some(symbol) => vec![symbol.to_uppercase()],
        None => config.analysis.symbols.clone(),
    };
    if symbols.is_empty() {
        anyhow::bail!("분석할 심볼이 없습니다 (analysis.symbols)");
    }

    let requests: Vec<CandleRequest> = symbols
        .iter()
        .map(|symbol| CandleRequest::new(symbol.clone(), timeframe, period))
        .collect();

    for (request, result) in requests.iter().zip(engine.run_many(&requests).await) {
        match result {
            Ok(report) => print_report(&report),
            Err(e) => println!("\n=== {} ===\n분석 실패: {}", request.symbol, e),
        }
    }

    Ok(())
}

async fn run_server(config: Config, engine: Arc<AnalysisEngine>) -> Result<(), anyhow::Error> {
    let state = AppState {
        engine,
        default_timeframe: config.analysis.timeframe,
        default_period: config.analysis.period,
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("서버 시작: http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// 설정된 심볼을 주기적으로 재분석해 출력
async fn run_watch(config: Config, engine: Arc<AnalysisEngine>) -> Result<(), anyhow::Error> {
    let every = Duration::from_millis(config.analysis.refresh_interval_ms);
    let mut tasks = Vec::new();

    for symbol in &config.analysis.symbols {
        let request = CandleRequest::new(symbol.clone(), config.analysis.timeframe, config.analysis.period);
        let (mut rx, handle) = engine.clone().spawn_refresh(request, every);

        tasks.push(handle);
        tasks.push(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if let Some(report) = snapshot {
                    print_report(&report);
                }
            }
        }));
    }

    log::info!("감시 시작: {}개 심볼, {}ms 간격", config.analysis.symbols.len(), every.as_millis());
    tokio::signal::ctrl_c().await?;
    log::info!("감시 종료");
    for task in tasks {
        task.abort();
    }

    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("\n=== {} {} ===", report.symbol, report.timeframe);
    if let Some(last) = report.candles.last() {
        println!(
            "마지막 캔들: {} 종가 {}",
            format_timestamp(last.candle.timestamp, "%Y-%m-%d %H:%M"),
            last.candle.close
        );
    }

    for signal in &report.signals {
        println!(
            "{:<14} {:>12.4}  {:<7} {:>5.1}",
            signal.indicator_name, signal.value, signal.signal, signal.strength
        );
    }
    for name in &report.skipped {
        println!("{:<14} {:>12}  (데이터 부족)", name, "-");
    }

    let agg = &report.aggregate;
    println!(
        "종합: {} ({:.1}) - 매수 {} / 매도 {} / 중립 {}",
        agg.overall, agg.strength, agg.counts.buy, agg.counts.sell, agg.counts.neutral
    );
}
