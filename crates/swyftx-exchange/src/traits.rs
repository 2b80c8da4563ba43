//! 커넥터가 노출하는 공용 타입 및 거래소 중립 인터페이스.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swyftx_core::{
    deserialize_flexible_decimal, Candle, Market, Order, OrderRequest, Symbol, Timeframe,
};

use crate::error::ExchangeError;

/// 거래소 작업을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// 거래소 중립 인터페이스.
///
/// 상위 전략 코드가 특정 거래소에 의존하지 않도록 커넥터의 핵심
/// 작업을 추상화합니다. 거래소별 확장 작업(실시간 호가, 출금 한도 등)은
/// 각 클라이언트의 고유 메서드로 노출됩니다.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// 거래 가능한 마켓 목록 조회.
    async fn fetch_markets(&self) -> ExchangeResult<Vec<Market>>;

    /// 과거 캔들스틱 조회. `since`/`until`은 epoch 밀리초 기준
    /// 시작/종료 시각.
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        since: Option<i64>,
        until: Option<i64>,
        limit: Option<u32>,
    ) -> ExchangeResult<Vec<Candle>>;

    /// 계좌 잔고 조회.
    async fn fetch_balance(&self) -> ExchangeResult<Vec<Balance>>;

    /// 새 주문 제출.
    async fn create_order(&self, request: &OrderRequest, market: &Market)
        -> ExchangeResult<Order>;

    /// 주문 취소.
    async fn cancel_order(&self, order_id: &str) -> ExchangeResult<()>;

    /// 거래소 이름 (로깅용).
    fn exchange_name(&self) -> &str;
}

/// 자산의 잔고 정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// 자산 코드 (예: "BTC", "AUD")
    pub asset: String,
    /// 사용 가능한 잔고
    pub available: Decimal,
}

/// 계정의 출금 한도 (AUD 기준).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalLimits {
    /// 기간 내 총 한도
    pub limit: Decimal,
    /// 사용한 금액
    pub used: Decimal,
    /// 남은 출금 가능액
    pub remaining: Decimal,
}

/// 입금/출금 이력 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransfer {
    /// 거래소 자산 ID
    pub asset_id: i64,
    /// 이체 수량
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub quantity: Decimal,
    /// 처리 시각 (epoch 밀리초)
    pub time: i64,
    /// 거래소 상태 문자열 (예: "COMPLETED")
    #[serde(default)]
    pub status: Option<String>,
}
