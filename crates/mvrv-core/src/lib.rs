//! # MVRV Core
//!
//! MVRV Z-Score 서비스의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일별 MVRV 원시 데이터 포인트 (`RawPoint`)
//! - 롤링 Z-Score 파생 포인트 (`DerivedPoint`)
//! - API 응답 구조체 (`RollingResponse`)
//! - 로깅 인프라

pub mod domain;
pub mod logging;

pub use domain::*;
pub use logging::*;
