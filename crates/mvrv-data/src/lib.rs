//! # MVRV Data
//!
//! 이 crate는 다음을 제공합니다:
//! - TTL 기반 시계열 캐시 저장소 (Redis / 인메모리)
//! - Coin Metrics Community API 클라이언트 (Ingestion Adapter)
//! - 캐시·페치·계산을 조정하는 갱신 오케스트레이터

pub mod error;
pub mod provider;
pub mod service;
pub mod storage;

pub use error::{DataError, Result};

// 저장소 타입 재내보내기
pub use storage::{MemorySeriesStore, RedisConfig, RedisSeriesStore, SeriesStore};

// 업스트림 제공자 재내보내기
pub use provider::{CoinMetricsClient, CoinMetricsConfig, MvrvSource};

// 오케스트레이터 재내보내기
pub use service::{
    RollingService, RollingServiceConfig, RAW_SERIES_KEY, ROLLING_KEY, TTL_HISTORICAL_SECS,
    TTL_ROLLING_SECS,
};
