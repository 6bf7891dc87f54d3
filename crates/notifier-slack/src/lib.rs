//! # Notifier Slack
//!
//! 트레이딩 어드바이저의 가격/조언을 Slack 채널로 전달하는 봇.
//!
//! # 명령어
//!
//! 봇을 멘션한 정확한 문자열에만 반응합니다:
//! - `@bot advice` - 최근 조언
//! - `@bot price` - 최근 가격
//! - `@bot donate` - 후원 주소
//! - `@bot real advice` - 명대사 한 줄
//! - `@bot help` - 명령어 목록

pub mod commands;
pub mod engine;
pub mod error;
pub mod notifier;
pub mod relative_time;
pub mod service;
pub mod slack;
pub mod transport;

pub use commands::{CommandKind, CommandTable, PLACEHOLDER};
pub use engine::{EngineEvent, EngineHandle, EngineMessage};
pub use error::{NotifierError, NotifierResult};
pub use notifier::*;
pub use service::{run_until, StopReason};
pub use slack::SlackRtmClient;
pub use transport::*;
