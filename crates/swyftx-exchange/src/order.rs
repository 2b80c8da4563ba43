//! 주문 변환: 정규화 주문 요청 ↔ 거래소 주문 인코딩.
//!
//! 거래소는 주문 유형과 방향의 조합을 숫자 코드 하나(1~6)로 인코딩합니다.
//! 이 모듈은 그 코드 테이블의 양방향 변환, 주문 생성 요청 본문 구성,
//! 주문 응답의 정규화를 담당합니다. 네트워크 IO는 없습니다.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use swyftx_core::{
    deserialize_flexible_decimal, deserialize_flexible_decimal_opt, DecimalExt, Market, Order,
    OrderKind, OrderRequest, OrderStatusType, Side,
};

use crate::error::ExchangeError;
use crate::market::SETTLEMENT_CURRENCY;
use crate::traits::ExchangeResult;

/// (주문 유형, 방향) → 거래소 주문 코드.
///
/// MARKET_BUY=1, MARKET_SELL=2, LIMIT_BUY=3, LIMIT_SELL=4,
/// STOP_LIMIT_BUY=5, STOP_LIMIT_SELL=6.
pub fn order_type_code(kind: OrderKind, side: Side) -> u8 {
    match (kind, side) {
        (OrderKind::Market, Side::Buy) => 1,
        (OrderKind::Market, Side::Sell) => 2,
        (OrderKind::Limit, Side::Buy) => 3,
        (OrderKind::Limit, Side::Sell) => 4,
        (OrderKind::StopLimit, Side::Buy) => 5,
        (OrderKind::StopLimit, Side::Sell) => 6,
    }
}

/// 거래소 주문 코드 → (주문 유형, 방향).
pub fn decode_order_type(code: u8) -> Option<(OrderKind, Side)> {
    match code {
        1 => Some((OrderKind::Market, Side::Buy)),
        2 => Some((OrderKind::Market, Side::Sell)),
        3 => Some((OrderKind::Limit, Side::Buy)),
        4 => Some((OrderKind::Limit, Side::Sell)),
        5 => Some((OrderKind::StopLimit, Side::Buy)),
        6 => Some((OrderKind::StopLimit, Side::Sell)),
        _ => None,
    }
}

/// `POST /orders/` 요청 본문.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    /// 결제 통화 (항상 AUD)
    pub primary: String,
    /// 거래 대상 자산의 거래소 ID
    pub secondary: String,
    /// 주문 수량 (수량 정밀도로 절삭)
    pub quantity: String,
    /// 수량의 기준 자산
    pub asset_quantity: String,
    /// 주문 유형 코드 (1~6)
    pub order_type: u8,
    /// 트리거 가격 (스톱 지정가 주문만, 가격 정밀도로 반올림)
    ///
    /// 매수는 primary-per-secondary, 매도는 secondary-per-primary 단위로
    /// 거래소 정의를 그대로 따릅니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<String>,
}

/// 정규화 주문 요청을 거래소 주문 생성 본문으로 변환합니다.
///
/// # Errors
/// 지정가/스톱 지정가 주문에 가격이 없거나, 스톱 지정가 주문에
/// 트리거 가격이 없으면 네트워크 호출 전에 `ArgumentsRequired`로
/// 실패합니다.
pub fn build_create_order_request(
    request: &OrderRequest,
    market: &Market,
) -> ExchangeResult<CreateOrderBody> {
    if request.kind.requires_price() && request.price.is_none() {
        return Err(ExchangeError::ArgumentsRequired(format!(
            "createOrder requires a price argument for a {} order",
            request.kind
        )));
    }

    let trigger_price = if request.kind.requires_trigger() {
        let trigger = request.trigger_price.ok_or_else(|| {
            ExchangeError::ArgumentsRequired(format!(
                "createOrder requires a triggerPrice parameter for a {} order",
                request.kind
            ))
        })?;
        Some(trigger.to_price_precision(market.price_precision).to_string())
    } else {
        None
    };

    Ok(CreateOrderBody {
        primary: SETTLEMENT_CURRENCY.to_string(),
        secondary: market.exchange_id.clone(),
        quantity: request
            .amount
            .to_amount_precision(market.amount_precision)
            .to_string(),
        asset_quantity: market.exchange_id.clone(),
        order_type: order_type_code(request.kind, request.side),
        trigger_price,
    })
}

/// 주문 응답의 중첩 `order` 구조.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderDetail {
    /// 주문 유형 코드 (1~6)
    pub order_type: u8,
    /// 결제 자산 ID
    pub primary_asset: i64,
    /// 거래 대상 자산 ID
    pub secondary_asset: i64,
    /// 수량 기준 자산 ID
    pub quantity_asset: i64,
    /// 주문 수량
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub quantity: Decimal,
    /// 트리거 가격
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub trigger: Option<Decimal>,
    /// 주문 상태 코드
    pub status: u8,
    /// 생성 시각 (epoch 밀리초)
    pub created_time: i64,
    /// 마지막 업데이트 시각 (epoch 밀리초)
    pub updated_time: i64,
    /// 체결된 수량
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub amount: Option<Decimal>,
    /// 주문 총액
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub total: Option<Decimal>,
    /// 체결 단가
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub rate: Option<Decimal>,
    /// AUD 기준 평가액
    #[serde(default, deserialize_with = "deserialize_flexible_decimal_opt")]
    pub aud_value: Option<Decimal>,
}

/// 주문 생성/조회 응답.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderResponse {
    /// 거래소 주문 ID
    pub order_uuid: String,
    /// 주문 상세
    pub order: RawOrderDetail,
    /// 즉시 처리 여부
    #[serde(default)]
    pub processed: bool,
}

/// 거래소 상태 코드 → 정규화 주문 상태.
///
/// 코드 테이블: 1 대기, 2 잔고 부족, 3 부분 체결, 4 체결, 5 접수 중,
/// 6 사용자 취소, 7 알 수 없는 오류, 8 시스템 취소, 9 최소 수량 미달,
/// 10 환불.
pub fn parse_order_status(code: u8) -> ExchangeResult<OrderStatusType> {
    match code {
        1 => Ok(OrderStatusType::Open),
        2 => Ok(OrderStatusType::Rejected),
        3 => Ok(OrderStatusType::PartiallyFilled),
        4 => Ok(OrderStatusType::Filled),
        5 => Ok(OrderStatusType::Pending),
        6 => Ok(OrderStatusType::Cancelled),
        7 => Ok(OrderStatusType::Rejected),
        8 => Ok(OrderStatusType::Cancelled),
        9 => Ok(OrderStatusType::Rejected),
        10 => Ok(OrderStatusType::Cancelled),
        other => Err(ExchangeError::ParseError(format!(
            "unknown order status code: {}",
            other
        ))),
    }
}

/// 거래소 주문 응답을 정규화 주문 엔티티로 변환합니다.
///
/// # Errors
/// 알 수 없는 주문 유형/상태 코드나 범위를 벗어난 타임스탬프는
/// 부분 엔티티 대신 `ParseError`로 실패합니다.
pub fn parse_order(raw: &RawOrderResponse, market: &Market) -> ExchangeResult<Order> {
    let (kind, side) = decode_order_type(raw.order.order_type).ok_or_else(|| {
        ExchangeError::ParseError(format!(
            "unknown order type code: {}",
            raw.order.order_type
        ))
    })?;

    let status = parse_order_status(raw.order.status)?;

    let created_at = DateTime::from_timestamp_millis(raw.order.created_time).ok_or_else(|| {
        ExchangeError::ParseError(format!(
            "order created_time out of range: {}",
            raw.order.created_time
        ))
    })?;
    let updated_at = DateTime::from_timestamp_millis(raw.order.updated_time).ok_or_else(|| {
        ExchangeError::ParseError(format!(
            "order updated_time out of range: {}",
            raw.order.updated_time
        ))
    })?;

    Ok(Order {
        id: Uuid::new_v4(),
        exchange_order_id: raw.order_uuid.clone(),
        symbol: market.symbol.clone(),
        side,
        kind,
        amount: raw.order.quantity,
        price: raw.order.rate,
        trigger_price: raw.order.trigger,
        status,
        filled_amount: raw.order.amount.unwrap_or(Decimal::ZERO),
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use swyftx_core::{FeeSchedule, Symbol};

    fn btc_market() -> Market {
        Market {
            exchange_id: "3".to_string(),
            symbol: Symbol::aud("BTC"),
            price_precision: 2,
            amount_precision: 8,
            min_order_increment: dec!(0.00000001),
            fees: FeeSchedule::default(),
            active: true,
        }
    }

    #[test]
    fn test_order_type_code_table() {
        assert_eq!(order_type_code(OrderKind::Market, Side::Buy), 1);
        assert_eq!(order_type_code(OrderKind::Market, Side::Sell), 2);
        assert_eq!(order_type_code(OrderKind::Limit, Side::Buy), 3);
        assert_eq!(order_type_code(OrderKind::Limit, Side::Sell), 4);
        assert_eq!(order_type_code(OrderKind::StopLimit, Side::Buy), 5);
        assert_eq!(order_type_code(OrderKind::StopLimit, Side::Sell), 6);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for kind in [OrderKind::Market, OrderKind::Limit, OrderKind::StopLimit] {
            for side in [Side::Buy, Side::Sell] {
                let code = order_type_code(kind, side);
                assert_eq!(decode_order_type(code), Some((kind, side)));
            }
        }
        assert_eq!(decode_order_type(0), None);
        assert_eq!(decode_order_type(7), None);
    }

    #[test]
    fn test_limit_order_requires_price() {
        let mut request = OrderRequest::limit_buy(Symbol::aud("BTC"), dec!(0.1), dec!(50000));
        request.price = None;

        let err = build_create_order_request(&request, &btc_market()).unwrap_err();
        assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
        assert!(err.to_string().contains("LIMIT"));
    }

    #[test]
    fn test_stop_limit_requires_trigger() {
        let mut request = OrderRequest::stop_limit(
            Symbol::aud("BTC"),
            Side::Buy,
            dec!(0.1),
            dec!(52000),
            dec!(51000),
        );
        request.trigger_price = None;

        let err = build_create_order_request(&request, &btc_market()).unwrap_err();
        assert!(matches!(err, ExchangeError::ArgumentsRequired(_)));
        assert!(err.to_string().contains("triggerPrice"));
    }

    #[test]
    fn test_market_order_body() {
        let request = OrderRequest::market_buy(Symbol::aud("BTC"), dec!(0.123456789));
        let body = build_create_order_request(&request, &btc_market()).unwrap();

        assert_eq!(body.primary, "AUD");
        assert_eq!(body.secondary, "3");
        assert_eq!(body.asset_quantity, "3");
        assert_eq!(body.order_type, 1);
        // 수량은 8자리로 절삭
        assert_eq!(body.quantity, "0.12345678");
        assert_eq!(body.trigger_price, None);
    }

    #[test]
    fn test_stop_limit_body_includes_rounded_trigger() {
        let request = OrderRequest::stop_limit(
            Symbol::aud("BTC"),
            Side::Buy,
            dec!(0.1),
            dec!(52000),
            dec!(51000.456),
        );
        let body = build_create_order_request(&request, &btc_market()).unwrap();

        assert_eq!(body.order_type, 5);
        assert_eq!(body.trigger_price.as_deref(), Some("51000.46"));
    }

    #[test]
    fn test_body_serialization_field_names() {
        let request = OrderRequest::stop_limit(
            Symbol::aud("BTC"),
            Side::Sell,
            dec!(1),
            dec!(51234.56),
            dec!(51234.567),
        );
        let body = build_create_order_request(&request, &btc_market()).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["assetQuantity"], "3");
        assert_eq!(json["orderType"], 6);
        assert_eq!(json["triggerPrice"], "51234.57");
    }

    #[test]
    fn test_status_mapping_table() {
        assert_eq!(parse_order_status(1).unwrap(), OrderStatusType::Open);
        assert_eq!(parse_order_status(3).unwrap(), OrderStatusType::PartiallyFilled);
        assert_eq!(parse_order_status(4).unwrap(), OrderStatusType::Filled);
        assert_eq!(parse_order_status(5).unwrap(), OrderStatusType::Pending);
        assert_eq!(parse_order_status(6).unwrap(), OrderStatusType::Cancelled);
        assert_eq!(parse_order_status(9).unwrap(), OrderStatusType::Rejected);
        assert!(parse_order_status(11).is_err());
    }

    #[test]
    fn test_parse_documented_order_response() {
        let raw: RawOrderResponse = serde_json::from_str(
            r#"{
                "orderUuid": "ord_4TgCaoJc7pY",
                "order": {
                    "order_type": 1,
                    "primary_asset": 2,
                    "secondary_asset": 293,
                    "quantity_asset": 293,
                    "quantity": 4923000,
                    "trigger": 0.00000923948724,
                    "status": 1,
                    "created_time": 1623296438209,
                    "updated_time": 1623296438200,
                    "amount": 0.002053467437821649,
                    "total": 4923000,
                    "rate": 0.00000923948724,
                    "aud_value": 99.17152556194523
                },
                "processed": false
            }"#,
        )
        .unwrap();

        let order = parse_order(&raw, &btc_market()).unwrap();

        assert_eq!(order.exchange_order_id, "ord_4TgCaoJc7pY");
        assert_eq!(order.kind, OrderKind::Market);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.status, OrderStatusType::Open);
        assert_eq!(order.amount, dec!(4923000));
        assert_eq!(order.filled_amount, dec!(0.002053467437821649));
        assert_eq!(order.price, Some(dec!(0.00000923948724)));
        assert_eq!(order.created_at.timestamp_millis(), 1623296438209);
    }

    #[test]
    fn test_unknown_order_type_code_fails() {
        let raw: RawOrderResponse = serde_json::from_str(
            r#"{
                "orderUuid": "ord_x",
                "order": {
                    "order_type": 9,
                    "primary_asset": 2,
                    "secondary_asset": 3,
                    "quantity_asset": 3,
                    "quantity": 1,
                    "status": 1,
                    "created_time": 1623296438209,
                    "updated_time": 1623296438209
                }
            }"#,
        )
        .unwrap();

        let err = parse_order(&raw, &btc_market()).unwrap_err();
        assert!(matches!(err, ExchangeError::ParseError(_)));
    }

    #[test]
    fn test_round_trip_preserves_side_kind_amount() {
        let market = btc_market();
        let request = OrderRequest::limit_buy(Symbol::aud("BTC"), dec!(0.12345678), dec!(50000));
        let body = build_create_order_request(&request, &market).unwrap();
        assert_eq!(body.order_type, 3);

        // 전송한 본문과 일치하는 합성 응답
        let response = RawOrderResponse {
            order_uuid: "ord_roundtrip".to_string(),
            order: RawOrderDetail {
                order_type: body.order_type,
                primary_asset: 1,
                secondary_asset: 3,
                quantity_asset: 3,
                quantity: body.quantity.parse().unwrap(),
                trigger: None,
                status: 1,
                created_time: 1623296438209,
                updated_time: 1623296438209,
                amount: None,
                total: None,
                rate: Some(dec!(50000)),
                aud_value: None,
            },
            processed: false,
        };

        let order = parse_order(&response, &market).unwrap();
        assert_eq!(order.side, request.side);
        assert_eq!(order.kind, request.kind);
        assert_eq!(
            order.amount,
            request.amount.to_amount_precision(market.amount_precision)
        );
    }
}
