//! 채팅 알림 액터.
//!
//! 최근 가격/조언을 보관하고, 채팅 명령어에 답하며, 새 조언을 채널에 알립니다.
//!
//! 상태 전이:
//! - **Unauthenticated**: 명령어 테이블 비어 있음, 대상 채널 없음
//! - **Ready**: `on_authenticated` 이후. 대상 채널은 찾았거나 영구히 없음
//!
//! 모든 이벤트는 한 번에 하나씩 전달된다고 가정합니다 (`service::run_until` 참고).

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use notifier_core::{Advice, AppConfig, Candle, Recommendation, TradingAdvisorConfig, WatchConfig};

use crate::commands::{CommandKind, CommandTable};
use crate::relative_time::from_now;
use crate::transport::{ChannelId, ChatTransport, InboundMessage, SelfIdentity, Session, TransportEvent};

/// 가격을 아직 모를 때 표시하는 문구.
pub const UNKNOWN_PRICE: &str = "Dont know yet :(";

/// 조언을 아직 받지 못했을 때 표시하는 문구.
pub const UNKNOWN_ADVICE: &str = "Dont got one yet :(";

/// 새 조언 알림 직전에 보내는 문구.
pub const ADVICE_ALERT: &str = "Guys! Important news!";

/// 후원 안내 메시지.
pub const DONATION_MESSAGE: &str = "You want to donate? How nice of you! You can send your coins here:\nBTC:\t1C8vyMaFsD4tdnUKwMiPTt1DocBcPsEiC6";

/// `real advice` 명령어가 고르는 명대사 목록.
pub const REAL_ADVICE: [&str; 7] = [
    "I don't throw darts at a board. I bet on sure things. Read Sun-tzu, The Art of War. Every battle is won before it is ever fought.",
    "Ever wonder why fund managers can't beat the S&P 500? 'Cause they're sheep, and sheep get slaughtered.",
    "If you're not inside, you're outside!",
    "The most valuable commodity I know of is information.",
    "It's not a question of enough, pal. It's a zero sum game, somebody wins, somebody loses. Money itself isn't lost or made, it's simply transferred from one perception to another.",
    "What's worth doing is worth doing for money. (Wait, wasn't I a free and open source bot?)",
    "When I get a hold of the son of a bitch who leaked this, I'm gonna tear his eyeballs out and I'm gonna suck his fucking skull.",
];

/// 아직 값을 모를 수 있는 관측값.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading<T> {
    /// 아직 받지 못함
    Unknown,
    /// 최근 값
    Known(T),
}

impl<T: std::fmt::Display> Reading<T> {
    /// 값이 없으면 `placeholder`를 사용해 문자열로 만듭니다.
    pub fn display_or(&self, placeholder: &str) -> String {
        match self {
            Reading::Unknown => placeholder.to_string(),
            Reading::Known(value) => value.to_string(),
        }
    }
}

/// 액터 상태 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierStatus {
    /// 인증 전
    Unauthenticated,
    /// 인증 완료, 디스패치 가능
    Ready,
}

/// 알림 액터 설정.
#[derive(Debug, Clone)]
pub struct NotifierSettings {
    /// 메시지를 보낼 채널 이름
    pub channel: String,
    /// soft 추천 무시 여부
    pub mute_soft: bool,
    /// 새 조언 즉시 알림 여부
    pub emit_updates: bool,
    /// 감시 시장 정보
    pub watch: WatchConfig,
    /// 어드바이저 정보
    pub trading_advisor: TradingAdvisorConfig,
}

impl NotifierSettings {
    /// 애플리케이션 설정에서 생성합니다.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            channel: config.slackbot.channel.clone(),
            mute_soft: config.slackbot.mute_soft,
            emit_updates: config.slackbot.emit_updates,
            watch: config.watch.clone(),
            trading_advisor: config.trading_advisor.clone(),
        }
    }
}

/// 프로세스 수명 동안 유지되는 액터 상태.
#[derive(Debug, Clone)]
pub struct NotifierState {
    /// 최근 종가
    pub latest_price: Reading<Decimal>,
    /// 최근 가격의 캔들 시작 시간
    pub latest_price_time: DateTime<Utc>,
    /// 최근 추천
    pub latest_advice: Reading<Recommendation>,
    /// 최근 추천을 받은 시각
    pub latest_advice_time: DateTime<Utc>,
    /// 봇 자신의 정보 (인증 후)
    pub self_identity: Option<SelfIdentity>,
    /// 메시지를 보낼 채널 (찾지 못하면 없음)
    pub target_channel: Option<ChannelId>,
}

impl NotifierState {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            latest_price: Reading::Unknown,
            latest_price_time: now,
            latest_advice: Reading::Unknown,
            latest_advice_time: now,
            self_identity: None,
            target_channel: None,
        }
    }
}

/// 채팅 알림 액터.
pub struct ChatNotifier<T: ChatTransport> {
    settings: NotifierSettings,
    transport: T,
    state: NotifierState,
    commands: CommandTable,
}

impl<T: ChatTransport> ChatNotifier<T> {
    /// 새 액터를 생성합니다. 명령어 테이블은 인증 전까지 비어 있습니다.
    pub fn new(settings: NotifierSettings, transport: T) -> Self {
        Self {
            settings,
            transport,
            state: NotifierState::new(),
            commands: CommandTable::new(),
        }
    }

    /// 현재 상태.
    pub fn state(&self) -> &NotifierState {
        &self.state
    }

    /// 명령어 테이블.
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// 전송 계층.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 상태 단계.
    pub fn status(&self) -> NotifierStatus {
        if self.state.self_identity.is_some() && self.commands.is_ready() {
            NotifierStatus::Ready
        } else {
            NotifierStatus::Unauthenticated
        }
    }

    /// 전송 계층 이벤트 하나를 처리합니다.
    pub async fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => self.on_transport_opened(),
            TransportEvent::Authenticated(session) => self.on_authenticated(session),
            TransportEvent::Message(message) => {
                self.on_inbound_message(&message).await;
            }
            TransportEvent::Error(message) => self.log_error(&message),
        }
    }

    /// 실시간 연결이 열렸을 때.
    pub fn on_transport_opened(&self) {
        info!(transport = self.transport.name(), "Slack: startup");
    }

    /// 인증 완료 시 식별 정보, 명령어 테이블, 대상 채널을 설정합니다.
    pub fn on_authenticated(&mut self, session: Session) {
        let Session { identity, channels } = session;

        self.commands.resolve(&identity);

        // 같은 이름이 여러 개면 마지막 채널
        let target = channels
            .iter()
            .rev()
            .find(|channel| channel.is_member && channel.name == self.settings.channel)
            .map(|channel| channel.id.clone());

        match &target {
            Some(channel) => info!(
                bot = %identity.name,
                channel = %channel,
                "인증 완료, 대상 채널 확인"
            ),
            None => warn!(
                bot = %identity.name,
                channel = %self.settings.channel,
                "대상 채널을 찾지 못했습니다. 봇이 해당 채널의 멤버인지 확인하세요. 모든 메시지 전송이 무시됩니다"
            ),
        }

        self.state.self_identity = Some(identity);
        self.state.target_channel = target;
    }

    /// 수신 메시지를 명령어 테이블과 정확히 비교해 처리합니다.
    ///
    /// 실행한 명령어를 반환합니다. 일치하지 않으면 `None`.
    pub async fn on_inbound_message(&self, message: &InboundMessage) -> Option<CommandKind> {
        let text = message.text.as_deref()?;
        let kind = self.commands.lookup(text)?;

        debug!(command = ?kind, "명령어 수신");
        self.dispatch(kind).await;
        Some(kind)
    }

    /// 캔들 마감 시 최근 가격을 갱신합니다.
    ///
    /// 가격은 `price` 명령어로만 조회되며 알림은 보내지 않습니다.
    /// `done`은 정확히 한 번 호출됩니다.
    pub fn on_price_update<F: FnOnce()>(&mut self, candle: &Candle, done: F) {
        self.state.latest_price = Reading::Known(candle.close);
        self.state.latest_price_time = candle.start;
        debug!(price = %candle.close, start = %candle.start, "가격 갱신");

        done();
    }

    /// 새 조언을 반영하고, 설정에 따라 채널에 알립니다.
    pub async fn on_advice_update(&mut self, advice: &Advice) {
        if self.settings.mute_soft && advice.recommendation.is_soft() {
            debug!("soft 조언 무시");
            return;
        }

        self.state.latest_advice = Reading::Known(advice.recommendation);
        self.state.latest_advice_time = Utc::now();
        info!(recommendation = %advice.recommendation, "조언 갱신");

        if self.settings.emit_updates {
            self.send(ADVICE_ALERT).await;
            self.dispatch(CommandKind::Advice).await;
        }
    }

    /// 호스트가 전송 계층/프로토콜 에러를 남기는 진입점.
    pub fn log_error(&self, message: &str) {
        error!(transport = self.transport.name(), "Slack ERROR: {}", message);
    }

    /// 명령어 응답을 만들어 대상 채널로 보냅니다.
    pub async fn dispatch(&self, kind: CommandKind) {
        match self.compose(kind) {
            Some(text) => self.send(&text).await,
            None => debug!(command = ?kind, "응답을 만들 수 없어 무시"),
        }
    }

    /// 명령어 응답 텍스트를 만듭니다.
    ///
    /// `help`는 봇 식별 정보가 있어야 하므로 인증 전에는 `None`입니다.
    pub fn compose(&self, kind: CommandKind) -> Option<String> {
        match kind {
            CommandKind::Advice => Some(self.advice_message()),
            CommandKind::Price => Some(self.price_message()),
            CommandKind::Donate => Some(DONATION_MESSAGE.to_string()),
            CommandKind::RealAdvice => Some(real_advice().to_string()),
            CommandKind::Help => self
                .state
                .self_identity
                .as_ref()
                .map(|identity| self.commands.help_text(identity)),
        }
    }

    fn advice_message(&self) -> String {
        let watch = &self.settings.watch;
        let advisor = &self.settings.trading_advisor;

        format!(
            "Advice for {} {} using {} at {} minute candles, is:\n{} {} (from {})",
            watch.exchange,
            watch.pair(),
            advisor.method,
            advisor.candle_size,
            self.state.latest_advice.display_or(UNKNOWN_ADVICE),
            watch.asset,
            from_now(self.state.latest_advice_time),
        )
    }

    fn price_message(&self) -> String {
        let watch = &self.settings.watch;

        format!(
            "Current price at {} {} is {} {} (from {})",
            watch.exchange,
            watch.pair(),
            self.state.latest_price.display_or(UNKNOWN_PRICE),
            watch.currency,
            from_now(self.state.latest_price_time),
        )
    }

    async fn send(&self, text: &str) {
        let Some(channel) = &self.state.target_channel else {
            debug!("대상 채널이 없어 메시지 전송 생략");
            return;
        };

        if let Err(e) = self.transport.send_message(text, channel).await {
            warn!(channel = %channel, "메시지 전송 실패: {}", e);
        }
    }
}

fn real_advice() -> &'static str {
    REAL_ADVICE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(REAL_ADVICE[0])
}
