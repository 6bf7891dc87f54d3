//! 액터 이벤트 루프.
//!
//! 전송 계층 이벤트와 엔진 이벤트를 하나의 `select!` 루프에서 소비하므로
//! 액터 상태는 잠금 없이 한 번에 하나의 이벤트로만 변경됩니다.

use std::future::Future;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::engine::EngineEvent;
use crate::notifier::ChatNotifier;
use crate::transport::{ChatTransport, TransportEvent};

/// 루프 종료 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 전송 계층 이벤트 스트림이 끝남
    TransportClosed,
    /// 종료 신호 수신
    Shutdown,
}

/// 엔진 이벤트 하나를 액터에 전달합니다.
pub async fn handle_engine_event<T: ChatTransport>(
    notifier: &mut ChatNotifier<T>,
    event: EngineEvent,
) {
    match event {
        EngineEvent::Candle { candle, ack } => notifier.on_price_update(&candle, move || {
            // 엔진이 이미 기다리지 않으면 무시
            let _ = ack.send(());
        }),
        EngineEvent::Advice(advice) => notifier.on_advice_update(&advice).await,
    }
}

/// 전송 계층이 닫히거나 `shutdown`이 완료될 때까지 이벤트를 처리합니다.
///
/// 엔진 스트림이 먼저 닫혀도 채팅 명령어 응답은 계속합니다.
pub async fn run_until<T, F>(
    notifier: &mut ChatNotifier<T>,
    mut transport_rx: mpsc::Receiver<TransportEvent>,
    mut engine_rx: mpsc::Receiver<EngineEvent>,
    shutdown: F,
) -> StopReason
where
    T: ChatTransport,
    F: Future,
{
    tokio::pin!(shutdown);
    let mut engine_open = true;

    info!("알림 봇 이벤트 루프 시작");

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("종료 신호 수신, 이벤트 루프 종료 중...");
                break StopReason::Shutdown;
            }
            event = transport_rx.recv() => match event {
                Some(event) => notifier.handle_event(event).await,
                None => {
                    warn!("전송 계층 이벤트 스트림 종료");
                    break StopReason::TransportClosed;
                }
            },
            event = engine_rx.recv(), if engine_open => match event {
                Some(event) => handle_engine_event(notifier, event).await,
                None => {
                    info!("엔진 이벤트 스트림 종료");
                    engine_open = false;
                }
            },
        }
    };

    info!(reason = ?reason, "알림 봇 이벤트 루프 종료");
    reason
}
