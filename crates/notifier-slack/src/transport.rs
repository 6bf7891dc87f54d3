//! 메시징 전송 계층 타입 및 trait 정의.
//!
//! 봇은 전송 계층을 두 방향으로만 사용합니다:
//! - 수신: `TransportEvent` 스트림 (연결, 인증, 메시지, 에러)
//! - 송신: `ChatTransport::send_message`

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::NotifierResult;

/// 채널 식별자 (예: "C024BE91L").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// 새 채널 식별자를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 식별자 문자열.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 인증 후 알게 되는 봇 자신의 정보.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelfIdentity {
    /// 사용자 ID
    pub id: String,
    /// 표시 이름
    pub name: String,
}

impl SelfIdentity {
    /// 새 식별 정보를 생성합니다.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// 디스패치 매칭에 쓰는 멘션 구문 (`<@ID>`).
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// 도움말에 보여줄 텍스트 멘션 (`@name`).
    pub fn display_mention(&self) -> String {
        format!("@{}", self.name)
    }
}

/// 봇이 속한 채널 정보.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelInfo {
    /// 채널 ID
    pub id: ChannelId,
    /// 채널 이름
    pub name: String,
    /// 봇의 멤버 여부
    #[serde(default)]
    pub is_member: bool,
}

impl ChannelInfo {
    /// 새 채널 정보를 생성합니다.
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_member: bool) -> Self {
        Self {
            id: ChannelId::new(id),
            name: name.into(),
            is_member,
        }
    }
}

/// 인증 완료 시 전달되는 세션 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 봇 자신의 정보
    pub identity: SelfIdentity,
    /// 봇이 알고 있는 채널 목록
    pub channels: Vec<ChannelInfo>,
}

/// 수신 메시지.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    /// 메시지 텍스트 (파일 공유 등에서는 없을 수 있음)
    #[serde(default)]
    pub text: Option<String>,
    /// 메시지가 온 채널 (디스패치에는 사용하지 않음)
    #[serde(default)]
    pub channel: Option<ChannelId>,
}

impl InboundMessage {
    /// 텍스트 메시지를 생성합니다.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            channel: None,
        }
    }

    /// 원본 채널을 설정합니다.
    pub fn in_channel(mut self, channel: ChannelId) -> Self {
        self.channel = Some(channel);
        self
    }
}

/// 전송 계층 이벤트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// 실시간 연결이 열림
    Opened,
    /// 인증 완료
    Authenticated(Session),
    /// 메시지 수신
    Message(InboundMessage),
    /// 전송 계층/프로토콜 에러
    Error(String),
}

/// 메시지 송신 trait.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// 채널에 텍스트 메시지를 전송합니다.
    ///
    /// 전달 확인은 하지 않습니다. 에러는 호출자가 로그로만 남깁니다.
    async fn send_message(&self, text: &str, channel: &ChannelId) -> NotifierResult<()>;

    /// 전송 계층 이름을 반환합니다.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        let identity = SelfIdentity::new("U023BECGF", "gekko");
        assert_eq!(identity.mention(), "<@U023BECGF>");
        assert_eq!(identity.display_mention(), "@gekko");
    }

    #[test]
    fn test_inbound_message_without_text() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"type":"message","channel":"C1","subtype":"file_share"}"#)
                .unwrap();
        assert_eq!(message.text, None);
        assert_eq!(message.channel, Some(ChannelId::new("C1")));
    }

    #[test]
    fn test_channel_info_default_membership() {
        let channel: ChannelInfo = serde_json::from_str(r#"{"id":"C1","name":"general"}"#).unwrap();
        assert!(!channel.is_member);
        assert_eq!(channel.id.as_str(), "C1");
    }
}
