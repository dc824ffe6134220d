//! 모든 핸들러에서 공유되는 애플리케이션 상태.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use mvrv_data::{RedisSeriesStore, RollingService};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
/// Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
pub struct AppState {
    /// 롤링 Z-Score 오케스트레이터 (캐시 + 페치 + 계산)
    pub service: Arc<RollingService>,

    /// Redis 저장소 핸들 (헬스 체크용, 인메모리 폴백 시 None)
    pub redis: Option<Arc<RedisSeriesStore>>,

    /// 서버 시작 시각
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새 상태를 생성합니다.
    pub fn new(service: Arc<RollingService>, redis: Option<Arc<RedisSeriesStore>>) -> Self {
        Self {
            service,
            redis,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// Redis 연결이 살아있는지 확인합니다.
    pub async fn is_redis_healthy(&self) -> bool {
        match &self.redis {
            Some(store) => store.health_check().await.unwrap_or(false),
            None => false,
        }
    }
}
