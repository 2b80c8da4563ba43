//! Swyftx 거래소 REST 커넥터.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 베어러 토큰 세션 수명 주기 (발급/갱신/로그아웃)
//! - 요청 서명: 논리 요청 → 전송 가능한 HTTP 기술자
//! - 자산 목록 → 정규화 마켓 카탈로그
//! - OHLCV 캔들 및 주문 응답 정규화
//! - HTTP 상태 → 에러 분류 매핑
//!
//! 재시도/백오프와 rate limiting은 상위 전송 계층의 책임이며
//! 이 크레이트에는 없습니다.

pub mod auth;
pub mod candle;
pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod order;
pub mod signer;
pub mod traits;

pub use auth::{Session, SessionManager};
pub use client::{LiveRate, RateSide, SwyftxClient};
pub use config::{SwyftxConfig, SwyftxEnvironment};
pub use error::*;
pub use signer::{AccessLevel, RequestSigner, SignedRequest};
pub use traits::*;
