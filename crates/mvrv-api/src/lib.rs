//! # MVRV API
//!
//! 2YR 롤링 Z-Score 데이터셋을 서빙하는 Axum 기반 REST API 서버입니다.
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`error`]: 통합 에러 응답
//! - [`tasks`]: 백그라운드 캐시 갱신 태스크

pub mod error;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::{health_router, rolling_router, service_info};
pub use state::AppState;
pub use tasks::{start_rolling_refresh, RefreshTaskConfig};
