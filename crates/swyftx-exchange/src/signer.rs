//! 요청 서명: 논리 요청 → 전송 가능한 HTTP 기술자.
//!
//! 공개 요청은 쿼리 파라미터를 그대로 전달하고, 비공개 요청은
//! 세션 검증 후 nonce가 포함된 JSON 본문과 베어러 헤더를 붙입니다.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::auth::SessionManager;
use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

/// 요청의 접근 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// 인증이 필요 없는 공개 엔드포인트
    Public,
    /// 베어러 토큰이 필요한 비공개 엔드포인트
    Private,
}

/// 전송 계층이 그대로 실행할 수 있는 요청 기술자.
#[derive(Debug)]
pub struct SignedRequest {
    /// 완성된 URL (공개 요청은 쿼리 포함)
    pub url: String,
    /// HTTP 메서드
    pub method: Method,
    /// 요청 헤더
    pub headers: HeaderMap,
    /// 직렬화된 JSON 본문 (비공개 요청만)
    pub body: Option<String>,
}

/// 요청 서명기.
///
/// 비공개 요청마다 세션 검증을 먼저 수행하며, 같은 서명기에서
/// 발급된 nonce는 호출 순서대로 엄격히 증가합니다.
pub struct RequestSigner {
    base_url: String,
    nonce: AtomicU64,
}

impl RequestSigner {
    /// 새 서명기 생성. nonce는 현재 epoch 밀리초에서 시작합니다.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            nonce: AtomicU64::new(Self::timestamp_ms()),
        }
    }

    /// 현재 타임스탬프(밀리초) 반환.
    fn timestamp_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// 단조 증가 nonce 발급.
    fn next_nonce(&self) -> u64 {
        self.nonce.fetch_add(1, Ordering::SeqCst)
    }

    /// 논리 요청을 서명해 HTTP 기술자를 생성합니다.
    ///
    /// `Private` 요청은 매 호출마다 세션 검증(`ensure_session`)을 먼저
    /// 수행한 뒤 파라미터에 nonce를 더해 본문으로 직렬화합니다.
    /// `Public` 요청은 파라미터를 쿼리 문자열로 전달하며 인증 헤더가 없습니다.
    pub async fn sign(
        &self,
        path: &str,
        access: AccessLevel,
        method: Method,
        params: Map<String, Value>,
        session: &SessionManager,
    ) -> ExchangeResult<SignedRequest> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        match access {
            AccessLevel::Public => {
                let url = if params.is_empty() {
                    url
                } else {
                    format!("{}?{}", url, Self::build_query(&params))
                };
                debug!("Signed public request: {} {}", method, url);

                Ok(SignedRequest {
                    url,
                    method,
                    headers: HeaderMap::new(),
                    body: None,
                })
            }
            AccessLevel::Private => {
                let session = session.ensure_session().await?;

                let mut body = params;
                body.insert("nonce".to_string(), Value::from(self.next_nonce()));

                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                headers.insert(
                    AUTHORIZATION,
                    session.auth_header().parse().map_err(|_| {
                        ExchangeError::ParseError(
                            "session token contains invalid header characters".to_string(),
                        )
                    })?,
                );

                debug!("Signed private request: {} {}", method, url);

                Ok(SignedRequest {
                    url,
                    method,
                    headers,
                    body: Some(Value::Object(body).to_string()),
                })
            }
        }
    }

    /// 파라미터에서 쿼리 문자열 생성. 값은 percent 인코딩됩니다.
    fn build_query(params: &Map<String, Value>) -> String {
        params
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                format!("{}={}", k, urlencoding::encode(&value))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
