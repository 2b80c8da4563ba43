//! Swyftx API 설정.
//!
//! Swyftx는 API 키 하나로 세션 토큰을 발급받는 베어러 인증을 사용합니다.
//! secret은 필요하지 않습니다.

use std::collections::HashMap;
use std::fmt;

use swyftx_core::FeeSchedule;

/// Swyftx API 환경 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwyftxEnvironment {
    /// 실거래
    #[default]
    Production,
    /// 데모 환경
    Demo,
}

impl SwyftxEnvironment {
    /// 이 환경의 REST API 기본 URL 반환.
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            SwyftxEnvironment::Production => "https://api.swyftx.com.au",
            SwyftxEnvironment::Demo => "https://api.demo.swyftx.com.au",
        }
    }
}

/// Swyftx 클라이언트 설정.
///
/// # 보안
/// - `Debug` 구현은 민감 정보(`api_key`)를 마스킹합니다.
#[derive(Clone)]
pub struct SwyftxConfig {
    /// API 키 (모든 비공개 요청의 토큰 발급에 필요)
    pub api_key: String,
    /// 환경 (실거래/데모)
    pub environment: SwyftxEnvironment,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 호가 통화별 수수료 오버라이드 (미설정 시 거래소 기본 수수료)
    pub fee_overrides: HashMap<String, FeeSchedule>,
    /// 테스트용 기본 URL 오버라이드
    pub base_url_override: Option<String>,
}

impl fmt::Debug for SwyftxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_key = if self.api_key.len() > 8 {
            format!(
                "{}...{}",
                &self.api_key[..4],
                &self.api_key[self.api_key.len() - 4..]
            )
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("SwyftxConfig")
            .field("api_key", &masked_key)
            .field("environment", &self.environment)
            .field("timeout_secs", &self.timeout_secs)
            .field("fee_overrides", &self.fee_overrides)
            .finish()
    }
}

impl SwyftxConfig {
    /// 새 설정 생성.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: SwyftxEnvironment::Production,
            timeout_secs: 30,
            fee_overrides: HashMap::new(),
            base_url_override: None,
        }
    }

    /// 데모 환경 사용.
    pub fn with_demo(mut self, demo: bool) -> Self {
        self.environment = if demo {
            SwyftxEnvironment::Demo
        } else {
            SwyftxEnvironment::Production
        };
        self
    }

    /// 호가 통화별 수수료 오버라이드 설정.
    pub fn with_fee_override(mut self, quote: impl Into<String>, fees: FeeSchedule) -> Self {
        self.fee_overrides.insert(quote.into().to_uppercase(), fees);
        self
    }

    /// 기본 URL을 오버라이드합니다 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// 환경 변수에서 생성.
    ///
    /// `SWYFTX_API_KEY`가 설정되지 않았으면 `None`을 반환합니다.
    /// `SWYFTX_DEMO=true`로 데모 환경을 선택할 수 있습니다.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("SWYFTX_API_KEY").ok()?;
        let demo = std::env::var("SWYFTX_DEMO")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        Some(Self::new(api_key).with_demo(demo))
    }

    /// REST API 기본 URL 반환.
    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .unwrap_or_else(|| self.environment.rest_base_url())
    }

    /// 호가 통화의 수수료 스케줄 반환 (오버라이드 우선, 없으면 기본값).
    pub fn fees_for_quote(&self, quote: &str) -> FeeSchedule {
        self.fee_overrides
            .get(&quote.to_uppercase())
            .copied()
            .unwrap_or_default()
    }

    /// API 키가 설정되어 있는지 확인.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_environment_urls() {
        let config = SwyftxConfig::new("key-1234567890");
        assert_eq!(config.base_url(), "https://api.swyftx.com.au");

        let demo = SwyftxConfig::new("key-1234567890").with_demo(true);
        assert_eq!(demo.base_url(), "https://api.demo.swyftx.com.au");
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = SwyftxConfig::new("super-secret-api-key");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-api-key"));
        assert!(debug.contains("supe..."));
    }

    #[test]
    fn test_fee_override_lookup() {
        let config = SwyftxConfig::new("key")
            .with_fee_override("aud", FeeSchedule::new(dec!(0.001), dec!(0.002)));

        assert_eq!(config.fees_for_quote("AUD").taker, dec!(0.002));
        // 오버라이드가 없는 통화는 기본 스케줄
        assert_eq!(config.fees_for_quote("USD").taker, dec!(0.006));
    }

    #[test]
    fn test_has_credentials() {
        assert!(SwyftxConfig::new("key").has_credentials());
        assert!(!SwyftxConfig::new("").has_credentials());
    }
}
