//! 트레이딩 조언 타입.
//!
//! 트레이딩 엔진이 생성하는 매매 추천 관련 타입을 정의합니다:
//! - `Recommendation` - 추천 강도/방향
//! - `Advice` - 추천 이벤트

use serde::{Deserialize, Serialize};

/// 엔진이 내놓는 추천 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    /// 매수 포지션
    Long,
    /// 매도 포지션
    Short,
    /// 약한 신호 (방향 없음)
    Soft,
}

impl Recommendation {
    /// 약한 신호인지 확인합니다.
    pub fn is_soft(&self) -> bool {
        matches!(self, Recommendation::Soft)
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Long => write!(f, "long"),
            Recommendation::Short => write!(f, "short"),
            Recommendation::Soft => write!(f, "soft"),
        }
    }
}

/// 엔진이 전달하는 조언 이벤트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// 추천 유형
    pub recommendation: Recommendation,
}

impl Advice {
    /// 새 조언을 생성합니다.
    pub fn new(recommendation: Recommendation) -> Self {
        Self { recommendation }
    }
}
