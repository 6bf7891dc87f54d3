//! 캔들 데이터 타입.
//!
//! 트레이딩 엔진이 캔들 마감 시 전달하는 OHLCV 데이터를 정의합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 고정 기간 동안의 가격 움직임을 집계한 캔들.
///
/// 엔진 쪽 메시지에는 `start`와 `close`만 필수이며 나머지 필드는 0으로 채워집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub start: DateTime<Utc>,
    /// 시가
    #[serde(default)]
    pub open: Decimal,
    /// 고가
    #[serde(default)]
    pub high: Decimal,
    /// 저가
    #[serde(default)]
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    #[serde(default)]
    pub volume: Decimal,
}

impl Candle {
    /// 종가와 시작 시간만으로 캔들을 생성합니다.
    pub fn closing_at(start: DateTime<Utc>, close: Decimal) -> Self {
        Self {
            start,
            open: close,
            high: close,
            low: close,
            close,
            volume: Decimal::ZERO,
        }
    }
}
