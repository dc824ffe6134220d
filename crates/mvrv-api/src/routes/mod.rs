//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/mvrv-2yr` - 2YR 롤링 Z-Score 전체 데이터셋 (JSON)
//! - 그 외 경로 - 서비스 정보 (JSON)

pub mod health;
pub mod rolling;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use rolling::rolling_router;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// 매칭되지 않은 경로에 대한 서비스 정보 응답.
pub async fn service_info() -> impl IntoResponse {
    Json(json!({
        "service": "MVRV Z-Score 2YR Rolling",
        "endpoints": {
            "GET /health": "Health check",
            "GET /api/mvrv-2yr": "Returns complete 2YR rolling Z-Score dataset (JSON)"
        }
    }))
}
