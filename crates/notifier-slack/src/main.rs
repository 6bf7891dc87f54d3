//! Slack 알림 봇 CLI.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use notifier_core::{init_logging, AppConfig, LogConfig};
use notifier_slack::{engine, run_until, ChatNotifier, NotifierSettings, SlackRtmClient};

/// 엔진 이벤트 채널 버퍼 크기.
const ENGINE_BUFFER: usize = 64;

#[derive(Parser)]
#[command(name = "notifier-slack")]
#[command(about = "Slack bot relaying trading price and advice updates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일 값보다 우선합니다
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Slack에 연결하고 표준 입력의 엔진 이벤트를 처리
    Run,

    /// 설정 파일을 검증하고 내용을 출력 (토큰 제외)
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("설정 로드 실패: {}", cli.config.display()))?;

    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    init_logging(log_config).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;

    match cli.command {
        Commands::CheckConfig => {
            println!("channel      : {}", config.slackbot.channel);
            println!("mute_soft    : {}", config.slackbot.mute_soft);
            println!("emit_updates : {}", config.slackbot.emit_updates);
            println!("api_url      : {}", config.slackbot.api_url);
            println!(
                "market       : {} {}",
                config.watch.exchange,
                config.watch.pair()
            );
            println!(
                "advisor      : {} ({} minute candles)",
                config.trading_advisor.method, config.trading_advisor.candle_size
            );
        }
        Commands::Run => {
            tracing::info!("Slack 알림 봇 시작");

            let (client, transport_rx) = SlackRtmClient::connect(&config.slackbot)
                .await
                .context("Slack RTM 연결 실패")?;

            let mut notifier = ChatNotifier::new(NotifierSettings::from_config(&config), client);

            let (handle, engine_rx) = engine::channel(ENGINE_BUFFER);
            let feed = tokio::spawn(async move {
                if let Err(e) = engine::feed_lines(BufReader::new(tokio::io::stdin()), handle).await
                {
                    tracing::warn!("엔진 입력 처리 중단: {}", e);
                }
            });

            run_until(&mut notifier, transport_rx, engine_rx, tokio::signal::ctrl_c()).await;

            feed.abort();
            if let Err(e) = notifier.transport().close().await {
                tracing::debug!("WebSocket 종료 중 에러: {}", e);
            }

            tracing::info!("Slack 알림 봇 종료");
        }
    }

    Ok(())
}
