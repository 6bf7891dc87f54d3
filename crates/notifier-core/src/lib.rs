//! # Notifier Core
//!
//! 조언 알림 봇의 핵심 타입을 제공합니다:
//! - 캔들 및 조언 도메인 타입
//! - 설정 관리
//! - 로깅 인프라
//! - 공통 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
