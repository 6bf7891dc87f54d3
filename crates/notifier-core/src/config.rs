//! 설정 관리.
//!
//! 이 모듈은 알림 봇의 설정을 정의하고 관리합니다.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Slack 봇 설정
    pub slackbot: SlackbotConfig,
    /// 감시 중인 시장 정보
    pub watch: WatchConfig,
    /// 트레이딩 어드바이저 정보
    pub trading_advisor: TradingAdvisorConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Slack 봇 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackbotConfig {
    /// 봇 토큰 (xoxb-...)
    pub token: SecretString,
    /// 메시지를 보낼 채널 이름
    pub channel: String,
    /// soft 추천 무시 여부
    #[serde(default)]
    pub mute_soft: bool,
    /// 새 조언을 채널에 즉시 알릴지 여부
    #[serde(default)]
    pub emit_updates: bool,
    /// Web API 기본 URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://slack.com/api".to_string()
}

impl SlackbotConfig {
    /// 새 Slack 봇 설정을 생성합니다.
    pub fn new(token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            channel: channel.into(),
            mute_soft: false,
            emit_updates: false,
            api_url: default_api_url(),
        }
    }

    /// soft 추천 무시 여부를 설정합니다.
    pub fn with_mute_soft(mut self, mute_soft: bool) -> Self {
        self.mute_soft = mute_soft;
        self
    }

    /// 조언 즉시 알림 여부를 설정합니다.
    pub fn with_emit_updates(mut self, emit_updates: bool) -> Self {
        self.emit_updates = emit_updates;
        self
    }

    /// Web API 기본 URL을 설정합니다.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// 감시 중인 시장 정보.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    /// 거래소 이름
    pub exchange: String,
    /// 호가 통화 (예: USDT)
    pub currency: String,
    /// 기준 자산 (예: BTC)
    pub asset: String,
}

impl WatchConfig {
    /// 새 시장 정보를 생성합니다.
    pub fn new(
        exchange: impl Into<String>,
        currency: impl Into<String>,
        asset: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            currency: currency.into(),
            asset: asset.into(),
        }
    }

    /// `통화/자산` 형식의 거래쌍 문자열.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.currency, self.asset)
    }
}

/// 트레이딩 어드바이저 정보.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingAdvisorConfig {
    /// 전략 이름
    pub method: String,
    /// 캔들 크기 (분)
    pub candle_size: u32,
}

impl TradingAdvisorConfig {
    /// 새 어드바이저 정보를 생성합니다.
    pub fn new(method: impl Into<String>, candle_size: u32) -> Self {
        Self {
            method: method.into(),
            candle_size,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("slackbot.mute_soft", false)?
            .set_default("slackbot.emit_updates", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("NOTIFIER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 필수 항목을 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.slackbot.token.expose_secret().trim().is_empty() {
            return Err(CoreError::Config("slackbot.token이 비어 있습니다".to_string()));
        }
        if self.slackbot.channel.trim().is_empty() {
            return Err(CoreError::Config("slackbot.channel이 비어 있습니다".to_string()));
        }
        if self.trading_advisor.candle_size == 0 {
            return Err(CoreError::Config(
                "trading_advisor.candle_size는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
