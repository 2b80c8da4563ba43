//! 베어러 토큰 세션 수명 주기.
//!
//! 처리 기능:
//! - 접근 토큰 발급 및 갱신 (POST /auth/refresh/)
//! - 로그아웃 (POST /auth/logout/)
//!
//! 거래소는 토큰을 7일간 유효하다고 안내하지만, 이 클라이언트는
//! 24시간의 보수적인 유효 기간을 적용해 주기적으로 재발급합니다.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::SwyftxConfig;
use crate::error::ExchangeError;
use crate::traits::ExchangeResult;

/// 클라이언트가 적용하는 토큰 유효 기간 (초).
const SESSION_VALIDITY_SECS: i64 = 86_400;

/// 토큰 발급 응답.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

/// 만료 추적이 포함된 세션 상태.
#[derive(Debug, Clone)]
pub struct Session {
    /// 접근 토큰 (JWT)
    pub token: String,
    /// 만료 시각
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// 새 세션을 생성합니다.
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self { token, expires_at }
    }

    /// 토큰이 아직 유효한지 확인.
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// 인증 헤더 값 반환.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// 베어러 토큰 세션 관리자.
///
/// 세션은 토큰과 만료 시각을 하나의 값으로 원자적으로 커밋합니다.
/// 만료된 세션에 동시 요청이 몰려도 갱신 호출은 하나로 합쳐집니다:
/// 갱신 뮤텍스를 기다리던 호출자는 잠금 획득 후 세션을 재확인하고,
/// 이미 갱신되었으면 새 발급 없이 그 토큰을 재사용합니다.
pub struct SessionManager {
    config: SwyftxConfig,
    client: Client,
    session: Arc<RwLock<Option<Session>>>,
    refresh_gate: Mutex<()>,
}

impl SessionManager {
    /// 새 세션 관리자 생성.
    pub fn new(config: SwyftxConfig, client: Client) -> Self {
        Self {
            config,
            client,
            session: Arc::new(RwLock::new(None)),
            refresh_gate: Mutex::new(()),
        }
    }

    /// 유효한 토큰을 보장하고 반환합니다. 필요 시 갱신합니다.
    ///
    /// 갱신 조건은 "토큰 없음 또는 만료됨"입니다.
    ///
    /// # Errors
    /// API 키가 설정되지 않았으면 `MissingCredential`,
    /// 발급 호출이 거부되면 `Unauthorized`를 반환하며,
    /// 실패 시 기존 세션은 변경되지 않습니다.
    pub async fn ensure_session(&self) -> ExchangeResult<Session> {
        if !self.config.has_credentials() {
            return Err(ExchangeError::MissingCredential(
                "swyftx requires an apiKey for all private requests".to_string(),
            ));
        }

        {
            let session_guard = self.session.read().await;
            if let Some(ref session) = *session_guard {
                if session.is_valid() {
                    debug!("Using cached session (expires at: {})", session.expires_at);
                    return Ok(session.clone());
                }
                warn!(
                    "Session expired (expires at: {}), refreshing...",
                    session.expires_at
                );
            } else {
                info!("No session found, requesting new token...");
            }
        }

        // 갱신 직렬화: 잠금을 기다린 호출자는 앞선 갱신 결과를 재사용
        let _gate = self.refresh_gate.lock().await;
        {
            let session_guard = self.session.read().await;
            if let Some(ref session) = *session_guard {
                if session.is_valid() {
                    debug!("Session refreshed by a concurrent caller, reusing it");
                    return Ok(session.clone());
                }
            }
        }

        self.mint_session().await
    }

    /// 세션 토큰을 강제로 발급합니다.
    async fn mint_session(&self) -> ExchangeResult<Session> {
        let url = format!("{}/auth/refresh/", self.config.base_url());

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct TokenRequest<'a> {
            api_key: &'a str,
        }

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&TokenRequest {
                api_key: &self.config.api_key,
            })
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            warn!("Token request rejected: {} - {}", status, body);
            return Err(ExchangeError::from_status(status, &body));
        }

        let token_resp: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ExchangeError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        let session = Session::new(
            token_resp.access_token,
            Utc::now() + Duration::seconds(SESSION_VALIDITY_SECS),
        );

        // 토큰과 만료 시각을 한 번의 쓰기로 커밋
        {
            let mut session_guard = self.session.write().await;
            *session_guard = Some(session.clone());
        }

        info!("Session token obtained, expires at: {}", session.expires_at);

        Ok(session)
    }

    /// 현재 세션을 로그아웃하고 로컬 상태를 비웁니다.
    pub async fn logout(&self) -> ExchangeResult<()> {
        let token = {
            let session_guard = self.session.read().await;
            match &*session_guard {
                Some(s) => s.auth_header(),
                None => return Ok(()), // 로그아웃할 세션 없음
            }
        };

        let url = format!("{}/auth/logout/", self.config.base_url());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", token)
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            warn!("Logout may have failed, clearing local session anyway");
        }

        let mut session_guard = self.session.write().await;
        *session_guard = None;
        info!("Session cleared");

        Ok(())
    }

    /// 초기 세션 설정 (캐시된 토큰 재사용).
    ///
    /// 유효한 세션이 있으면 API 호출 없이 재사용됩니다.
    pub async fn set_cached_session(&self, session: Session) {
        let mut session_guard = self.session.write().await;
        *session_guard = Some(session);
    }

    /// 현재 캐시된 세션 반환 (API 호출 없이).
    pub async fn cached_session(&self) -> Option<Session> {
        let session_guard = self.session.read().await;
        session_guard.clone()
    }

    /// 유효한 세션이 있는지 확인.
    pub async fn has_valid_session(&self) -> bool {
        let session_guard = self.session.read().await;
        session_guard.as_ref().map(|s| s.is_valid()).unwrap_or(false)
    }
}
