//! 롤링 Z-Score 캐시 백그라운드 갱신기.
//!
//! 고정 주기(기본: 24시간)마다 강제 갱신을 실행해 파생/원시
//! 캐시를 선제적으로 데워 둡니다. 실패는 로그만 남기고 넘어갑니다.
//! 이전 캐시 엔트리는 TTL이 만료될 때까지 그대로 서빙되며,
//! 다음 주기나 온디맨드 요청이 자연스러운 재시도가 됩니다.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use mvrv_data::RollingService;

/// 갱신 태스크 설정.
#[derive(Debug, Clone)]
pub struct RefreshTaskConfig {
    /// 갱신 주기 (기본: 24시간)
    pub refresh_interval: Duration,
    /// 서버 기동 후 첫 갱신까지의 대기 시간 (기본: 10초)
    pub startup_delay: Duration,
}

impl Default for RefreshTaskConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(24 * 60 * 60),
            startup_delay: Duration::from_secs(10),
        }
    }
}

impl RefreshTaskConfig {
    /// 환경변수에서 설정 로드.
    ///
    /// * `REFRESH_INTERVAL_SECS` - 갱신 주기 (초, 기본: 86400)
    /// * `REFRESH_STARTUP_DELAY_SECS` - 기동 후 첫 갱신 대기 (초, 기본: 10)
    pub fn from_env() -> Self {
        let refresh_interval_secs: u64 = std::env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 60 * 60);

        let startup_delay_secs: u64 = std::env::var("REFRESH_STARTUP_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            startup_delay: Duration::from_secs(startup_delay_secs),
        }
    }
}

/// 롤링 Z-Score 갱신 태스크 시작.
///
/// 온디맨드 요청 경로와 같은 오케스트레이터 연산을 호출하므로
/// 두 경로가 동시에 실행되어도 추가 조정이 필요 없습니다.
pub fn start_rolling_refresh(
    service: Arc<RollingService>,
    config: RefreshTaskConfig,
    shutdown_token: CancellationToken,
) {
    tokio::spawn(async move {
        info!(
            interval_secs = config.refresh_interval.as_secs(),
            "Rolling Z-Score refresh task started"
        );

        // 서버 초기화 완료 후 시작
        tokio::select! {
            _ = tokio::time::sleep(config.startup_delay) => {}
            _ = shutdown_token.cancelled() => {
                info!("Refresh task: shutdown signal received during startup");
                return;
            }
        }

        // 첫 갱신 즉시 실행 (캐시 워밍)
        run_refresh(&service).await;

        let mut refresh_interval = interval(config.refresh_interval);
        refresh_interval.tick().await; // 첫 tick 건너뛰기 (이미 위에서 실행함)

        loop {
            tokio::select! {
                _ = refresh_interval.tick() => {
                    run_refresh(&service).await;
                }
                _ = shutdown_token.cancelled() => {
                    info!("Refresh task: shutdown signal received, stopping");
                    break;
                }
            }
        }
    });
}

/// 강제 갱신 1회 실행. 오류는 로그만 남깁니다.
async fn run_refresh(service: &RollingService) {
    match service.get_rolling(true).await {
        Ok(response) => {
            if let Some(latest) = response.data.last() {
                info!(
                    points = response.data.len(),
                    latest_date = %latest.date,
                    latest_zscore = latest.zscore,
                    "Successfully refreshed rolling Z-Score cache"
                );
            } else {
                info!(points = 0, "Refreshed rolling Z-Score cache (empty dataset)");
            }
        }
        Err(e) => {
            error!(error = %e, "Scheduled rolling Z-Score refresh failed");
        }
    }
}
