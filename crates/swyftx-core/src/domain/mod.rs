//! 커넥터가 노출하는 정규화 도메인 엔티티.

mod candle;
mod market;
mod order;

pub use candle::*;
pub use market::*;
pub use order::*;
