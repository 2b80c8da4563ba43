//! 주문 타입 및 관리.
//!
//! 이 모듈은 커넥터의 주문 관련 타입을 정의합니다:
//! - `Side` - 주문 방향 (매수/매도)
//! - `OrderKind` - 주문 유형 (시장가, 지정가, 스톱 지정가)
//! - `OrderStatusType` - 주문 상태
//! - `OrderRequest` - 주문 요청
//! - `Order` - 정규화된 주문 엔티티

use crate::types::{Price, Quantity, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 주문 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl Side {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// 주문 유형.
///
/// Swyftx가 지원하는 세 가지 유형만 표현합니다. 방향과의 조합은
/// 거래소의 숫자 주문 코드(1~6)로 매핑되며, 문자열 폴백 없이
/// enum 매치로만 해석됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// 시장가 주문 - 현재 시장 가격으로 즉시 체결
    Market,
    /// 지정가 주문 - 지정 가격 이상/이하에서 체결
    Limit,
    /// 스톱 지정가 주문 - 트리거 도달 시 지정가 주문 등록
    StopLimit,
}

impl OrderKind {
    /// 가격 인자가 필요한 유형인지 확인합니다.
    pub fn requires_price(&self) -> bool {
        matches!(self, OrderKind::Limit | OrderKind::StopLimit)
    }

    /// 트리거 가격이 필요한 유형인지 확인합니다.
    pub fn requires_trigger(&self) -> bool {
        matches!(self, OrderKind::StopLimit)
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::StopLimit => write!(f, "STOP_LIMIT"),
        }
    }
}

/// 주문 상태 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// 거래소가 수락했으나 아직 활성화되지 않음
    Pending,
    /// 체결 대기 중
    Open,
    /// 부분 체결됨
    PartiallyFilled,
    /// 전량 체결됨
    Filled,
    /// 사용자 또는 시스템에 의해 취소됨
    Cancelled,
    /// 거래소에서 거부됨
    Rejected,
}

impl OrderStatusType {
    /// 주문이 최종 상태인지 확인합니다.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            OrderStatusType::Filled | OrderStatusType::Cancelled | OrderStatusType::Rejected
        )
    }

    /// 주문이 여전히 활성 상태인지 확인합니다.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatusType::Pending | OrderStatusType::Open | OrderStatusType::PartiallyFilled
        )
    }
}

/// 새 주문 생성을 위한 주문 요청.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// 거래 심볼
    pub symbol: Symbol,
    /// 주문 방향
    pub side: Side,
    /// 주문 유형
    pub kind: OrderKind,
    /// 거래 수량
    pub amount: Quantity,
    /// 지정가 (지정가/스톱 지정가 주문에 필수)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// 트리거 가격 (스톱 지정가 주문에 필수)
    ///
    /// 매수 주문은 primary-per-secondary (예: 52000 AUD/BTC),
    /// 매도 주문은 secondary-per-primary (예: 0.0000192 BTC/AUD) 단위입니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Price>,
}

impl OrderRequest {
    /// 시장가 매수 주문을 생성합니다.
    pub fn market_buy(symbol: Symbol, amount: Quantity) -> Self {
        Self {
            symbol,
            side: Side::Buy,
            kind: OrderKind::Market,
            amount,
            price: None,
            trigger_price: None,
        }
    }

    /// 시장가 매도 주문을 생성합니다.
    pub fn market_sell(symbol: Symbol, amount: Quantity) -> Self {
        Self {
            symbol,
            side: Side::Sell,
            kind: OrderKind::Market,
            amount,
            price: None,
            trigger_price: None,
        }
    }

    /// 지정가 매수 주문을 생성합니다.
    pub fn limit_buy(symbol: Symbol, amount: Quantity, price: Price) -> Self {
        Self {
            symbol,
            side: Side::Buy,
            kind: OrderKind::Limit,
            amount,
            price: Some(price),
            trigger_price: None,
        }
    }

    /// 지정가 매도 주문을 생성합니다.
    pub fn limit_sell(symbol: Symbol, amount: Quantity, price: Price) -> Self {
        Self {
            symbol,
            side: Side::Sell,
            kind: OrderKind::Limit,
            amount,
            price: Some(price),
            trigger_price: None,
        }
    }

    /// 스톱 지정가 주문을 생성합니다.
    pub fn stop_limit(
        symbol: Symbol,
        side: Side,
        amount: Quantity,
        price: Price,
        trigger_price: Price,
    ) -> Self {
        Self {
            symbol,
            side,
            kind: OrderKind::StopLimit,
            amount,
            price: Some(price),
            trigger_price: Some(trigger_price),
        }
    }
}

/// 거래소 응답에서 정규화된 주문 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// 내부 주문 ID
    pub id: Uuid,
    /// 거래소 주문 ID (orderUuid)
    pub exchange_order_id: String,
    /// 거래 심볼
    pub symbol: Symbol,
    /// 주문 방향
    pub side: Side,
    /// 주문 유형
    pub kind: OrderKind,
    /// 주문 수량
    pub amount: Quantity,
    /// 지정가/체결 단가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// 트리거 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Price>,
    /// 현재 상태
    pub status: OrderStatusType,
    /// 체결된 수량
    pub filled_amount: Quantity,
    /// 생성 타임스탬프
    pub created_at: DateTime<Utc>,
    /// 마지막 업데이트 타임스탬프
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// 남은 체결 수량을 반환합니다.
    pub fn remaining_amount(&self) -> Quantity {
        self.amount - self.filled_amount
    }

    /// 주문이 전량 체결되었는지 확인합니다.
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatusType::Filled
    }

    /// 주문이 활성 상태인지 확인합니다.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// 주문의 명목 가치를 계산합니다.
    pub fn notional_value(&self) -> Option<Decimal> {
        self.price.map(|p| p * self.amount)
    }
}
