//! 트레이딩 심볼 정의.
//!
//! Swyftx는 모든 자산을 단일 결제 통화(AUD)에 대해서만 거래하므로,
//! 심볼은 기준 자산과 호가 자산의 쌍으로 단순하게 표현됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 거래 가능한 상품을 나타내는 트레이딩 심볼.
///
/// 예: BTC/AUD, ETH/AUD.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 기준 자산 (예: BTC, ETH)
    pub base: String,
    /// 호가 자산 (예: AUD)
    pub quote: String,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// AUD 호가 심볼을 생성합니다.
    pub fn aud(base: impl Into<String>) -> Self {
        Self::new(base, "AUD")
    }

    /// "BASE/QUOTE" 형식 문자열에서 심볼을 파싱합니다.
    pub fn from_string(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    /// 표준 심볼 문자열 형식을 반환합니다.
    pub fn to_standard_string(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::aud("btc");
        assert_eq!(symbol.base, "BTC");
        assert_eq!(symbol.quote, "AUD");
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::new("ETH", "AUD");
        assert_eq!(symbol.to_string(), "ETH/AUD");
    }

    #[test]
    fn test_symbol_from_string() {
        let symbol = Symbol::from_string("XRP/AUD").unwrap();
        assert_eq!(symbol.base, "XRP");
        assert_eq!(symbol.quote, "AUD");

        assert!(Symbol::from_string("XRPAUD").is_none());
        assert!(Symbol::from_string("/AUD").is_none());
    }
}
