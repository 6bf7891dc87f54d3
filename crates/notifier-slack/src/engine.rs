//! 트레이딩 엔진 → 액터 이벤트 피드.
//!
//! 엔진은 캔들 마감과 조언을 `EngineHandle`로 밀어 넣습니다. 캔들은 액터가
//! 처리를 끝냈다는 확인(ack)을 받은 뒤에야 다음 캔들로 넘어갑니다.
//!
//! 바이너리에서는 표준 입력의 한 줄짜리 JSON을 엔진 이벤트로 읽습니다:
//!
//! ```text
//! {"type":"candle","start":"2024-01-01T00:00:00Z","close":"42000.5"}
//! {"type":"advice","recommendation":"long"}
//! ```

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use notifier_core::{Advice, Candle};

use crate::error::{NotifierError, NotifierResult};

/// 액터로 전달되는 엔진 이벤트.
#[derive(Debug)]
pub enum EngineEvent {
    /// 캔들 마감. 처리가 끝나면 `ack`로 알립니다.
    Candle {
        candle: Candle,
        ack: oneshot::Sender<()>,
    },
    /// 새 조언
    Advice(Advice),
}

/// 엔진 쪽 한 줄 메시지.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineMessage {
    Candle(Candle),
    Advice(Advice),
}

/// 엔진 이벤트 송신 핸들.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineEvent>,
}

/// 엔진 이벤트 채널을 생성합니다.
pub fn channel(buffer: usize) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EngineHandle { tx }, rx)
}

impl EngineHandle {
    /// 캔들을 보내고 액터의 처리 완료를 기다립니다.
    pub async fn push_candle(&self, candle: Candle) -> NotifierResult<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(EngineEvent::Candle { candle, ack })
            .await
            .map_err(|_| NotifierError::Disconnected("액터가 종료되었습니다".to_string()))?;

        done.await
            .map_err(|_| NotifierError::Disconnected("캔들 처리 확인을 받지 못했습니다".to_string()))
    }

    /// 조언을 보냅니다.
    pub async fn push_advice(&self, advice: Advice) -> NotifierResult<()> {
        self.tx
            .send(EngineEvent::Advice(advice))
            .await
            .map_err(|_| NotifierError::Disconnected("액터가 종료되었습니다".to_string()))
    }

    /// 한 줄 메시지를 해당 이벤트로 보냅니다.
    pub async fn push(&self, message: EngineMessage) -> NotifierResult<()> {
        match message {
            EngineMessage::Candle(candle) => self.push_candle(candle).await,
            EngineMessage::Advice(advice) => self.push_advice(advice).await,
        }
    }
}

/// 줄 단위 JSON을 읽어 엔진 이벤트로 보냅니다.
///
/// 빈 줄은 건너뛰고, 파싱할 수 없는 줄은 경고만 남깁니다.
/// 입력이 끝나면 전달한 이벤트 수를 반환합니다.
pub async fn feed_lines<R>(reader: R, handle: EngineHandle) -> NotifierResult<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<EngineMessage>(line) {
            Ok(message) => {
                debug!(?message, "엔진 이벤트 수신");
                handle.push(message).await?;
                forwarded += 1;
            }
            Err(e) => warn!(line = %line, "엔진 메시지 파싱 실패: {}", e),
        }
    }

    info!(forwarded = forwarded, "엔진 입력 종료");
    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier_core::Recommendation;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_engine_messages() {
        let candle: EngineMessage = serde_json::from_str(
            r#"{"type":"candle","start":"2024-01-01T00:00:00Z","close":"42000.5"}"#,
        )
        .unwrap();
        assert!(matches!(candle, EngineMessage::Candle(c) if c.close == dec!(42000.5)));

        let advice: EngineMessage =
            serde_json::from_str(r#"{"type":"advice","recommendation":"soft"}"#).unwrap();
        assert_eq!(advice, EngineMessage::Advice(Advice::new(Recommendation::Soft)));
    }

    #[tokio::test]
    async fn test_push_candle_waits_for_ack() {
        let (handle, mut rx) = channel(4);

        let consumer = tokio::spawn(async move {
            match rx.recv().await {
                Some(EngineEvent::Candle { candle, ack }) => {
                    ack.send(()).unwrap();
                    candle.close
                }
                other => panic!("unexpected event: {:?}", other),
            }
        });

        let candle = Candle::closing_at(chrono::Utc::now(), dec!(100));
        handle.push_candle(candle).await.unwrap();
        assert_eq!(consumer.await.unwrap(), dec!(100));
    }

    #[tokio::test]
    async fn test_push_candle_without_ack_fails() {
        let (handle, mut rx) = channel(4);

        let consumer = tokio::spawn(async move {
            // ack를 보내지 않고 버림
            let _ = rx.recv().await;
        });

        let candle = Candle::closing_at(chrono::Utc::now(), dec!(100));
        let result = handle.push_candle(candle).await;
        consumer.await.unwrap();

        assert!(matches!(result, Err(NotifierError::Disconnected(_))));
    }
}
