//! 도메인 모델.

mod advice;
mod candle;

pub use advice::*;
pub use candle::*;
