//! 정밀한 금융 계산을 위한 Decimal 유틸리티.
//!
//! 이 모듈은 금융 계산에 필요한 정밀 소수점 타입 및 유틸리티를 제공합니다:
//! - `Price` / `Quantity` 타입 별칭
//! - `DecimalExt` - 반올림/내림 확장 트레이트
//! - `precision_from_increment` - 최소 주문 단위에서 소수 자릿수 유도
//! - 숫자/문자열 혼용 필드를 위한 serde 헬퍼

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 주문 수량을 위한 타입.
pub type Quantity = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 지정된 소수 자릿수로 반올림합니다 (사사오입).
    fn to_price_precision(&self, dp: u32) -> Decimal;

    /// 지정된 소수 자릿수로 절삭합니다 (0 방향 내림).
    ///
    /// 주문 수량은 반올림 시 보유량을 초과할 수 있으므로 항상 절삭합니다.
    fn to_amount_precision(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn to_price_precision(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    }

    fn to_amount_precision(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
            .normalize()
    }
}

/// 최소 주문 단위에서 소수 자릿수를 유도합니다.
///
/// `0.001` → 3, `0.1` → 1, `1` → 0. 10의 거듭제곱 경계에서
/// 부동소수점 `log10`이 일으키는 오프바이원을 피하기 위해
/// Decimal 곱셈 루프로 계산합니다 (`0.0009999` → 3).
pub fn precision_from_increment(increment: Decimal) -> u32 {
    if increment <= Decimal::ZERO {
        return 0;
    }

    let threshold = Decimal::new(1, 1); // 0.1
    let mut value = increment;
    let mut places = 0u32;

    // 10^-(k+1) < increment <= 10^-k 가 되는 k를 셉니다
    while value <= threshold {
        value *= Decimal::TEN;
        places += 1;
    }
    places
}

/// 숫자 또는 문자열로 인코딩된 Decimal 필드를 역직렬화합니다.
///
/// Swyftx 응답은 같은 필드를 `"4261.48"`과 `10015`처럼
/// 문자열/숫자 양쪽 표현으로 혼용합니다.
pub fn deserialize_flexible_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(d) => Ok(d),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// `deserialize_flexible_decimal`의 Option 버전.
pub fn deserialize_flexible_decimal_opt<'de, D>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(Decimal),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(d)) => Ok(Some(d)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_precision_from_increment() {
        assert_eq!(precision_from_increment(dec!(0.001)), 3);
        assert_eq!(precision_from_increment(dec!(0.1)), 1);
        assert_eq!(precision_from_increment(dec!(1)), 0);
        assert_eq!(precision_from_increment(dec!(0.00000001)), 8);
    }

    #[test]
    fn test_precision_from_increment_power_of_ten_boundary() {
        // log10 기반 계산이 2를 반환하던 경계 케이스
        assert_eq!(precision_from_increment(dec!(0.0009999)), 3);
        assert_eq!(precision_from_increment(dec!(0.005)), 2);
    }

    #[test]
    fn test_precision_from_increment_degenerate() {
        assert_eq!(precision_from_increment(dec!(0)), 0);
        assert_eq!(precision_from_increment(dec!(10)), 0);
    }

    #[test]
    fn test_amount_precision_truncates() {
        assert_eq!(dec!(0.0029).to_amount_precision(3), dec!(0.002));
        assert_eq!(dec!(1.999).to_amount_precision(0), dec!(1));
    }

    #[test]
    fn test_price_precision_rounds() {
        assert_eq!(dec!(52000.456).to_price_precision(2), dec!(52000.46));
        assert_eq!(dec!(0.00001925).to_price_precision(7), dec!(0.0000193));
    }

    #[test]
    fn test_flexible_decimal() {
        #[derive(serde::Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "deserialize_flexible_decimal")]
            value: Decimal,
        }

        let from_string: Probe = serde_json::from_str(r#"{"value": "4261.48"}"#).unwrap();
        assert_eq!(from_string.value, dec!(4261.48));

        let from_number: Probe = serde_json::from_str(r#"{"value": 10015}"#).unwrap();
        assert_eq!(from_number.value, dec!(10015));

        assert!(serde_json::from_str::<Probe>(r#"{"value": "abc"}"#).is_err());
    }
}
