//! 알림 봇 에러 타입.

/// 알림 작업용 Result 타입.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("메시지 전송 실패: {0}")]
    SendFailed(String),

    #[error("인증 실패: {0}")]
    Auth(String),

    #[error("WebSocket 에러: {0}")]
    WebSocket(String),

    #[error("연결 끊김: {0}")]
    Disconnected(String),

    #[error("네트워크 에러: {0}")]
    Network(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),
}
