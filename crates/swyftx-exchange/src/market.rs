//! 자산 목록 → 정규화 마켓 카탈로그.
//!
//! Swyftx는 모든 자산을 결제 통화(AUD)에 대해서만 거래하므로
//! 자산 레코드 하나가 `BASE/AUD` 마켓 하나로 정규화됩니다.
//! 결제 통화 자신은 거래 쌍이 아니므로 목록에서 제외됩니다.

use rust_decimal::Decimal;
use serde::Deserialize;

use swyftx_core::{
    deserialize_flexible_decimal, precision_from_increment, Market, Symbol,
};

use crate::config::SwyftxConfig;

/// 거래소의 단일 결제 통화.
pub const SETTLEMENT_CURRENCY: &str = "AUD";

/// `GET /markets/assets/`의 자산 레코드.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    /// 거래소 자산 ID
    pub id: i64,
    /// 자산 코드 (예: "BTC")
    pub code: String,
    /// 자산 이름
    #[serde(default)]
    pub name: Option<String>,
    /// 가격 소수 자릿수
    pub price_scale: u32,
    /// 최소 주문 단위
    #[serde(deserialize_with = "deserialize_flexible_decimal")]
    pub minimum_order_increment: Decimal,
}

/// 자산 목록을 마켓 목록으로 정규화합니다.
///
/// 업스트림 순서를 보존하며, 결제 통화 제외 외의 중복 제거는 없습니다.
pub fn parse_markets(assets: Vec<RawAsset>, config: &SwyftxConfig) -> Vec<Market> {
    assets
        .into_iter()
        .filter(|asset| !asset.code.eq_ignore_ascii_case(SETTLEMENT_CURRENCY))
        .map(|asset| parse_market(asset, config))
        .collect()
}

/// 자산 레코드 하나를 마켓으로 정규화합니다.
fn parse_market(asset: RawAsset, config: &SwyftxConfig) -> Market {
    let symbol = Symbol::new(asset.code, SETTLEMENT_CURRENCY);
    let fees = config.fees_for_quote(&symbol.quote);

    Market {
        exchange_id: asset.id.to_string(),
        amount_precision: precision_from_increment(asset.minimum_order_increment),
        price_precision: asset.price_scale,
        min_order_increment: asset.minimum_order_increment,
        symbol,
        fees,
        active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use swyftx_core::FeeSchedule;

    fn sample_assets() -> Vec<RawAsset> {
        serde_json::from_str(
            r#"[
                {"id": 1, "code": "AUD", "name": "Australian Dollar", "price_scale": 2, "minimum_order_increment": 0.01},
                {"id": 3, "code": "BTC", "name": "Bitcoin", "price_scale": 2, "minimum_order_increment": "0.00000001"},
                {"id": 5, "code": "XRP", "name": "Ripple", "price_scale": 4, "minimum_order_increment": 0.001}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_settlement_currency_excluded() {
        let config = SwyftxConfig::new("key");
        let markets = parse_markets(sample_assets(), &config);

        assert_eq!(markets.len(), 2);
        assert!(markets.iter().all(|m| m.base() != SETTLEMENT_CURRENCY));
        assert!(markets
            .iter()
            .all(|m| m.symbol.to_string().ends_with("/AUD")));
    }

    #[test]
    fn test_upstream_order_preserved() {
        let config = SwyftxConfig::new("key");
        let markets = parse_markets(sample_assets(), &config);

        assert_eq!(markets[0].symbol.to_string(), "BTC/AUD");
        assert_eq!(markets[1].symbol.to_string(), "XRP/AUD");
    }

    #[test]
    fn test_precision_derivation() {
        let config = SwyftxConfig::new("key");
        let markets = parse_markets(sample_assets(), &config);

        let btc = &markets[0];
        assert_eq!(btc.exchange_id, "3");
        assert_eq!(btc.price_precision, 2);
        assert_eq!(btc.amount_precision, 8);

        let xrp = &markets[1];
        assert_eq!(xrp.price_precision, 4);
        assert_eq!(xrp.amount_precision, 3);
    }

    #[test]
    fn test_fee_resolution() {
        let default_config = SwyftxConfig::new("key");
        let markets = parse_markets(sample_assets(), &default_config);
        assert_eq!(markets[0].fees.taker, dec!(0.006));

        let override_config = SwyftxConfig::new("key")
            .with_fee_override("AUD", FeeSchedule::new(dec!(0.001), dec!(0.003)));
        let markets = parse_markets(sample_assets(), &override_config);
        assert_eq!(markets[0].fees.maker, dec!(0.001));
        assert_eq!(markets[0].fees.taker, dec!(0.003));
    }
}
