//! 정규화된 마켓 레코드.
//!
//! 거래소 자산 목록의 항목 하나가 마켓 하나로 정규화됩니다.
//! 호가 자산은 항상 거래소의 단일 결제 통화(AUD)입니다.

use crate::types::{Price, Symbol};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 마켓의 메이커/테이커 수수료 스케줄.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// 메이커 수수료율 (0.006 = 0.6%)
    pub maker: Decimal,
    /// 테이커 수수료율
    pub taker: Decimal,
}

impl FeeSchedule {
    /// 새 수수료 스케줄을 생성합니다.
    pub fn new(maker: Decimal, taker: Decimal) -> Self {
        Self { maker, taker }
    }
}

impl Default for FeeSchedule {
    /// 거래소 기본 수수료 (메이커/테이커 모두 0.6%).
    fn default() -> Self {
        Self {
            maker: dec!(0.006),
            taker: dec!(0.006),
        }
    }
}

/// 거래 가능한 마켓의 정규화 레코드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// 거래소별 자산 식별자 (주문 요청의 secondary 필드에 사용)
    pub exchange_id: String,
    /// 표준 심볼 (BASE/AUD)
    pub symbol: Symbol,
    /// 가격 소수 자릿수
    pub price_precision: u32,
    /// 수량 소수 자릿수 (최소 주문 단위에서 유도)
    pub amount_precision: u32,
    /// 최소 주문 단위
    pub min_order_increment: Price,
    /// 수수료 스케줄
    pub fees: FeeSchedule,
    /// 거래 가능 여부
    pub active: bool,
}

impl Market {
    /// 기준 자산 코드를 반환합니다.
    pub fn base(&self) -> &str {
        &self.symbol.base
    }

    /// 호가 자산 코드를 반환합니다.
    pub fn quote(&self) -> &str {
        &self.symbol.quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_schedule() {
        let fees = FeeSchedule::default();
        assert_eq!(fees.maker, dec!(0.006));
        assert_eq!(fees.taker, dec!(0.006));
    }

    #[test]
    fn test_market_accessors() {
        let market = Market {
            exchange_id: "3".to_string(),
            symbol: Symbol::aud("BTC"),
            price_precision: 2,
            amount_precision: 8,
            min_order_increment: dec!(0.00000001),
            fees: FeeSchedule::default(),
            active: true,
        };

        assert_eq!(market.base(), "BTC");
        assert_eq!(market.quote(), "AUD");
    }
}
