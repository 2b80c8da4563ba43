//! 거래소 에러 타입.

use thiserror::Error;

/// 거래소 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// API 키 미설정 (모든 비공개 요청에 필요)
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// 인증/권한 에러 (토큰 발급 거부 포함)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 주문 유형에 필요한 인자 누락
    #[error("Arguments required: {0}")]
    ArgumentsRequired(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 잔고 부족
    #[error("Insufficient balance: {0}")]
    InsufficientBalance(String),

    /// 리소스를 찾을 수 없음 (주문, 자산 등)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// 거래소 서버 이용 불가 (5xx)
    #[error("Exchange unavailable: {0}")]
    Unavailable(String),

    /// 기타 API 에러
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 알 수 없는 에러
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ExchangeError {
    /// HTTP 상태 코드를 에러 분류로 매핑합니다.
    ///
    /// 본문에 알려진 에러 코드가 있으면 상태 코드보다 우선합니다
    /// (잔고 부족은 상태와 무관하게 `InsufficientBalance`).
    ///
    /// 상태 테이블은 호출자가 의존하는 안정적인 계약입니다:
    /// - 401/403/511 → `Unauthorized`
    /// - 404/410 → `NotFound`
    /// - 418/429 → `RateLimited`
    /// - 5xx → `Unavailable`
    /// - 그 외 비 2xx → `ApiError`
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = exchange_error_detail(body);

        if let Some(mapped) = detail
            .as_ref()
            .and_then(|d| map_error_code(d.code.as_deref()?, d.display()))
        {
            return mapped;
        }

        let message = detail
            .map(|d| d.display())
            .unwrap_or_else(|| body.to_string());

        match status.as_u16() {
            401 | 403 | 511 => ExchangeError::Unauthorized(message),
            404 | 410 => ExchangeError::NotFound(message),
            418 | 429 => ExchangeError::RateLimited,
            500..=599 => ExchangeError::Unavailable(message),
            code => ExchangeError::ApiError {
                code: i32::from(code),
                message,
            },
        }
    }

    /// 상위 전송 계층에서 재시도할 수 있는 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::NetworkError(_)
                | ExchangeError::RateLimited
                | ExchangeError::Unavailable(_)
                | ExchangeError::Timeout(_)
        )
    }

    /// 인증 에러인지 확인.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ExchangeError::Unauthorized(_) | ExchangeError::MissingCredential(_)
        )
    }

    /// 재시도하면 안 되는 치명적 에러인지 확인.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExchangeError::Unauthorized(_)
                | ExchangeError::MissingCredential(_)
                | ExchangeError::ArgumentsRequired(_)
                | ExchangeError::InsufficientBalance(_)
        )
    }
}

/// 거래소 에러 응답에서 추출한 코드/메시지 쌍.
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorDetail {
    fn display(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code.clone(),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        }
    }
}

/// 거래소 에러 응답 본문에서 코드와 메시지를 추출합니다.
///
/// Swyftx는 `{"error": {"error": "...", "message": "..."}}` 형태로
/// 에러를 반환합니다.
fn exchange_error_detail(body: &str) -> Option<ErrorDetail> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: RawDetail,
    }

    #[derive(serde::Deserialize)]
    struct RawDetail {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if parsed.error.error.is_none() && parsed.error.message.is_none() {
        return None;
    }
    Some(ErrorDetail {
        code: parsed.error.error,
        message: parsed.error.message,
    })
}

/// 알려진 거래소 에러 코드를 타입화된 에러로 매핑합니다.
fn map_error_code(code: &str, message: String) -> Option<ExchangeError> {
    if code.eq_ignore_ascii_case("InsufficientFunds")
        || code.eq_ignore_ascii_case("InsufficientBalance")
    {
        return Some(ExchangeError::InsufficientBalance(message));
    }
    None
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ExchangeError::NetworkError(err.to_string())
        } else {
            ExchangeError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping_table() {
        assert!(matches!(
            ExchangeError::from_status(StatusCode::UNAUTHORIZED, ""),
            ExchangeError::Unauthorized(_)
        ));
        assert!(matches!(
            ExchangeError::from_status(StatusCode::FORBIDDEN, ""),
            ExchangeError::Unauthorized(_)
        ));
        assert!(matches!(
            ExchangeError::from_status(StatusCode::NOT_FOUND, ""),
            ExchangeError::NotFound(_)
        ));
        assert!(matches!(
            ExchangeError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ExchangeError::RateLimited
        ));
        assert!(matches!(
            ExchangeError::from_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            ExchangeError::Unavailable(_)
        ));
        assert!(matches!(
            ExchangeError::from_status(StatusCode::BAD_REQUEST, ""),
            ExchangeError::ApiError { code: 400, .. }
        ));
    }

    #[test]
    fn test_error_body_extraction() {
        let body = r#"{"error": {"error": "InvalidOrder", "message": "quantity too small"}}"#;
        let err = ExchangeError::from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "API error 400: InvalidOrder: quantity too small"
        );
    }

    #[test]
    fn test_insufficient_funds_code_overrides_status() {
        // 잔고 부족은 HTTP 상태와 무관하게 코드로 분류됨
        let body = r#"{"error": {"error": "InsufficientFunds", "message": "not enough AUD"}}"#;
        let err = ExchangeError::from_status(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ExchangeError::InsufficientBalance(_)));
        assert!(err.to_string().contains("not enough AUD"));

        let err = ExchangeError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(matches!(err, ExchangeError::InsufficientBalance(_)));

        // 알 수 없는 코드는 기존 상태 테이블로 떨어짐
        let other = r#"{"error": {"error": "InvalidOrder", "message": "bad"}}"#;
        assert!(matches!(
            ExchangeError::from_status(StatusCode::BAD_REQUEST, other),
            ExchangeError::ApiError { code: 400, .. }
        ));
    }

    #[test]
    fn test_classification() {
        assert!(ExchangeError::RateLimited.is_retryable());
        assert!(ExchangeError::MissingCredential("apiKey".into()).is_fatal());
        assert!(ExchangeError::Unauthorized("bad key".into()).is_auth_error());
        assert!(!ExchangeError::ArgumentsRequired("price".into()).is_retryable());
    }
}
