//! 2YR 롤링 Z-Score 데이터셋 endpoint.

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use mvrv_core::RollingResponse;

/// 2YR 롤링 Z-Score 전체 데이터셋 조회.
///
/// 캐시가 유효하면 캐시된 페이로드를 그대로 반환하고,
/// 아니면 재계산합니다. 강제 갱신은 스케줄 경로 전용입니다.
///
/// GET /api/mvrv-2yr
pub async fn get_rolling_dataset(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<RollingResponse>> {
    let response = state.service.get_rolling(false).await?;
    Ok(Json(response))
}

/// 롤링 데이터셋 라우터 생성.
pub fn rolling_router() -> Router<Arc<AppState>> {
    Router::new().route("/mvrv-2yr", get(get_rolling_dataset))
}
