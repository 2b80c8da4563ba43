//! # Swyftx Core
//!
//! Swyftx 커넥터의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 커넥터와 상위 트레이딩 클라이언트가 공유하는 기본 타입을 제공합니다:
//! - 주문 요청 및 주문 엔티티 타입
//! - 정규화된 마켓 레코드 및 수수료 스케줄
//! - 캔들스틱(OHLCV) 구조체
//! - 심볼 및 타임프레임 정의
//! - 소수점 정밀도 유틸리티
//! - 로깅 인프라

pub mod domain;
pub mod logging;
pub mod types;

pub use domain::*;
pub use logging::*;
pub use types::*;
