//! MVRV Z-Score API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! Redis 캐시에 연결하고(실패 시 인메모리 폴백), Coin Metrics
//! 클라이언트를 구성한 뒤 일일 캐시 갱신 태스크를 띄웁니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use mvrv_api::routes::{health_router, rolling_router, service_info};
use mvrv_api::state::AppState;
use mvrv_api::tasks::{start_rolling_refresh, RefreshTaskConfig};
use mvrv_core::logging::init_logging_from_env;
use mvrv_data::{
    CoinMetricsClient, CoinMetricsConfig, MemorySeriesStore, RedisConfig, RedisSeriesStore,
    RollingService, SeriesStore,
};

/// 서버 설정 구조체.
struct ServerConfig {
    /// 바인딩할 호스트 주소
    host: String,
    /// 바인딩할 포트
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8787);

        Self { host, port }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS` 환경변수가 설정되어 있으면 해당 origin만 허용하고,
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

/// 시계열 저장소 연결.
///
/// Redis 연결에 실패하면 인메모리 저장소로 폴백합니다.
/// 폴백 시 프로세스 재시작마다 캐시가 비므로 운영 환경에서는
/// Redis 사용을 권장합니다.
async fn connect_store() -> (Arc<dyn SeriesStore>, Option<Arc<RedisSeriesStore>>) {
    match RedisSeriesStore::connect(&RedisConfig::from_env()).await {
        Ok(redis) => {
            let redis = Arc::new(redis);
            (redis.clone() as Arc<dyn SeriesStore>, Some(redis))
        }
        Err(e) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory store");
            (Arc::new(MemorySeriesStore::new()), None)
        }
    }
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging_from_env().map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))?;

    let server_config = ServerConfig::from_env();

    // 저장소/업스트림/오케스트레이터 구성
    let (store, redis) = connect_store().await;
    let source = Arc::new(CoinMetricsClient::new(CoinMetricsConfig::from_env()));
    let service = Arc::new(RollingService::new(store, source));

    // 백그라운드 일일 갱신 태스크
    let shutdown_token = CancellationToken::new();
    start_rolling_refresh(
        service.clone(),
        RefreshTaskConfig::from_env(),
        shutdown_token.clone(),
    );

    let state = Arc::new(AppState::new(service, redis));

    let app = Router::new()
        .nest("/health", health_router())
        .nest("/api", rolling_router())
        .fallback(service_info)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(state);

    let addr = server_config.socket_addr()?;
    info!(%addr, "Starting MVRV Z-Score API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
        .await?;

    // 백그라운드 태스크에 종료 전파
    shutdown_token.cancel();
    info!("Server shutdown complete");

    Ok(())
}
