//! Slack RTM(Real Time Messaging) 전송 계층.
//!
//! 1. Web API `rtm.start`로 세션을 열어 봇 정보, 채널 목록, WebSocket URL을 받습니다.
//! 2. WebSocket에 연결하고 수신 프레임을 `TransportEvent`로 바꿔 채널로 넘깁니다.
//! 3. 송신은 `{"id", "type": "message", "channel", "text"}` 프레임으로 보냅니다.
//!
//! 재연결은 하지 않습니다. 소켓이 닫히면 이벤트 스트림이 끝납니다.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info, warn};

use notifier_core::SlackbotConfig;

use crate::error::{NotifierError, NotifierResult};
use crate::transport::{
    ChannelId, ChannelInfo, ChatTransport, InboundMessage, SelfIdentity, Session, TransportEvent,
};

/// 수신 이벤트 채널 버퍼 크기.
const EVENT_BUFFER: usize = 256;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ============================================================================
// Web API 응답 타입
// ============================================================================

/// `rtm.start` 응답.
#[derive(Debug, Deserialize)]
struct RtmStartResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "self", default)]
    self_identity: Option<SelfIdentity>,
    #[serde(default)]
    channels: Vec<ChannelInfo>,
}

/// `rtm.start`로 연 RTM 세션.
#[derive(Debug, Clone)]
pub struct RtmSession {
    /// WebSocket URL
    pub url: String,
    /// 봇 정보와 채널 목록
    pub session: Session,
}

/// `rtm.start`를 호출해 RTM 세션을 엽니다.
pub async fn start_session(
    client: &reqwest::Client,
    api_url: &str,
    token: &SecretString,
) -> NotifierResult<RtmSession> {
    let url = format!("{}/rtm.start", api_url.trim_end_matches('/'));
    debug!(url = %url, "RTM 세션 요청");

    let response = client
        .post(&url)
        .bearer_auth(token.expose_secret())
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(NotifierError::Auth(format!("HTTP {}: {}", status, body)));
    }

    let body: RtmStartResponse = response.json().await?;

    if !body.ok {
        return Err(NotifierError::Auth(
            body.error.unwrap_or_else(|| "unknown_error".to_string()),
        ));
    }

    let url = body
        .url
        .ok_or_else(|| NotifierError::Auth("응답에 WebSocket URL이 없습니다".to_string()))?;
    let identity = body
        .self_identity
        .ok_or_else(|| NotifierError::Auth("응답에 봇 정보가 없습니다".to_string()))?;

    Ok(RtmSession {
        url,
        session: Session {
            identity,
            channels: body.channels,
        },
    })
}

// ============================================================================
// WebSocket 프레임
// ============================================================================

/// RTM 수신 프레임.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RtmFrame {
    Hello,
    Message(InboundMessage),
    Error { error: RtmFrameError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RtmFrameError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
}

/// 송신 메시지에 대한 응답 (`type` 필드 없음).
#[derive(Debug, Deserialize)]
struct RtmReply {
    ok: bool,
    reply_to: u64,
    #[serde(default)]
    error: Option<RtmFrameError>,
}

/// RTM 송신 프레임.
#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    id: u64,
    #[serde(rename = "type")]
    kind: &'static str,
    channel: &'a str,
    text: &'a str,
}

/// 텍스트 프레임을 전송 계층 이벤트로 변환합니다.
///
/// 봇이 다루지 않는 프레임은 `None`.
pub fn parse_frame(text: &str) -> Option<TransportEvent> {
    if let Ok(frame) = serde_json::from_str::<RtmFrame>(text) {
        return match frame {
            RtmFrame::Hello => Some(TransportEvent::Opened),
            RtmFrame::Message(message) => Some(TransportEvent::Message(message)),
            RtmFrame::Error { error } => Some(TransportEvent::Error(format!(
                "{} (code {})",
                error.msg, error.code
            ))),
            RtmFrame::Other => None,
        };
    }

    if let Ok(reply) = serde_json::from_str::<RtmReply>(text) {
        if !reply.ok {
            let detail = reply
                .error
                .map(|e| format!("{} (code {})", e.msg, e.code))
                .unwrap_or_default();
            return Some(TransportEvent::Error(format!(
                "message {} rejected: {}",
                reply.reply_to, detail
            )));
        }
        return None;
    }

    debug!(frame = %text, "알 수 없는 RTM 프레임");
    None
}

/// 송신 프레임 JSON을 만듭니다.
pub fn outgoing_frame(id: u64, text: &str, channel: &ChannelId) -> NotifierResult<String> {
    let frame = OutgoingMessage {
        id,
        kind: "message",
        channel: channel.as_str(),
        text,
    };
    Ok(serde_json::to_string(&frame)?)
}

// ============================================================================
// Slack RTM 클라이언트
// ============================================================================

/// Slack RTM 클라이언트.
pub struct SlackRtmClient {
    sink: Mutex<SplitSink<WsStream, Message>>,
    next_id: AtomicU64,
}

impl SlackRtmClient {
    /// 세션을 열고 WebSocket에 연결합니다.
    ///
    /// 반환된 수신기는 `Authenticated` 이벤트로 시작합니다.
    pub async fn connect(
        config: &SlackbotConfig,
    ) -> NotifierResult<(Self, mpsc::Receiver<TransportEvent>)> {
        let http = reqwest::Client::new();
        let rtm = start_session(&http, &config.api_url, &config.token).await?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tx.send(TransportEvent::Authenticated(rtm.session))
            .await
            .map_err(|_| NotifierError::Disconnected("이벤트 수신기가 닫혔습니다".to_string()))?;

        info!("Connecting to Slack RTM WebSocket");
        let (ws, _) = connect_async(rtm.url.as_str())
            .await
            .map_err(|e| NotifierError::WebSocket(e.to_string()))?;
        info!("Connected to Slack RTM WebSocket");

        let (sink, stream) = ws.split();
        tokio::spawn(read_frames(stream, tx));

        Ok((
            Self {
                sink: Mutex::new(sink),
                next_id: AtomicU64::new(1),
            },
            rx,
        ))
    }

    /// WebSocket 연결을 닫습니다.
    pub async fn close(&self) -> NotifierResult<()> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(|e| NotifierError::WebSocket(e.to_string()))
    }
}

/// 소켓이 닫힐 때까지 프레임을 읽어 이벤트로 넘깁니다.
async fn read_frames(mut stream: SplitStream<WsStream>, tx: mpsc::Sender<TransportEvent>) {
    while let Some(frame) = stream.next().await {
        let event = match frame {
            Ok(Message::Text(text)) => parse_frame(&text),
            Ok(Message::Close(frame)) => {
                info!(?frame, "Slack RTM 연결 종료");
                break;
            }
            Ok(_) => None,
            Err(e) => {
                let _ = tx.send(TransportEvent::Error(e.to_string())).await;
                break;
            }
        };

        if let Some(event) = event {
            if tx.send(event).await.is_err() {
                break;
            }
        }
    }

    warn!("Slack RTM 수신 종료");
}

#[async_trait]
impl ChatTransport for SlackRtmClient {
    async fn send_message(&self, text: &str, channel: &ChannelId) -> NotifierResult<()> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let json = outgoing_frame(id, text, channel)?;

        self.sink
            .lock()
            .await
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;

        debug!(id = id, channel = %channel, "RTM 메시지 전송");
        Ok(())
    }

    fn name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        assert_eq!(parse_frame(r#"{"type":"hello"}"#), Some(TransportEvent::Opened));
    }

    #[test]
    fn test_parse_message() {
        let event = parse_frame(r#"{"type":"message","channel":"C1","user":"U9","text":"<@U1> price","ts":"1.0"}"#);
        assert_eq!(
            event,
            Some(TransportEvent::Message(
                InboundMessage::text("<@U1> price").in_channel(ChannelId::new("C1"))
            ))
        );
    }

    #[test]
    fn test_parse_error_frame() {
        let event = parse_frame(r#"{"type":"error","error":{"code":1,"msg":"Socket URL has expired"}}"#);
        assert_eq!(
            event,
            Some(TransportEvent::Error("Socket URL has expired (code 1)".to_string()))
        );
    }

    #[test]
    fn test_parse_replies_and_unknown() {
        assert_eq!(parse_frame(r#"{"ok":true,"reply_to":1,"ts":"1.0","text":"hi"}"#), None);
        assert!(matches!(
            parse_frame(r#"{"ok":false,"reply_to":2,"error":{"code":2,"msg":"message text is missing"}}"#),
            Some(TransportEvent::Error(_))
        ));
        assert_eq!(parse_frame(r#"{"type":"user_typing","channel":"C1"}"#), None);
        assert_eq!(parse_frame("not json"), None);
    }

    #[test]
    fn test_outgoing_frame() {
        let json = outgoing_frame(7, "hello\nworld", &ChannelId::new("C1")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], 7);
        assert_eq!(value["type"], "message");
        assert_eq!(value["channel"], "C1");
        assert_eq!(value["text"], "hello\nworld");
    }
}
