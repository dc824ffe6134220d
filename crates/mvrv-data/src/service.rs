//! 롤링 Z-Score 갱신 오케스트레이터.
//!
//! 캐시 조회, 업스트림 페치, 롤링 계산, 캐시 기록을 조정합니다.
//!
//! # 동작 흐름
//!
//! ```text
//! get_rolling(force_refresh)
//!         │
//!   force │ 아니고 파생 캐시 유효? ──── YES ──→ 캐시된 응답 그대로 반환
//!         │ NO
//!         ▼
//!   원시 캐시 유효? ── NO ──→ Coin Metrics 페치 → 원시 캐시 기록 (7일 TTL)
//!         │ YES
//!         ▼
//!   원시 포인트 < 731 → InsufficientHistory (치명적)
//!         │
//!         ▼
//!   전체 시계열 롤링 Z-Score 재계산 (항상 전 구간)
//!         │
//!         ▼
//!   파생 캐시 기록 (24시간 TTL, 실패해도 응답은 반환)
//! ```
//!
//! 캐시 기록 실패는 warn 로그 후 무시합니다. 응답의 정확성이 캐시
//! 내구성보다 우선입니다. 동시에 들어온 강제 갱신 두 건이 중복
//! 계산할 수 있지만 결과가 결정적이므로 마지막 기록이 이겨도 같은
//! 값입니다.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};
use crate::provider::MvrvSource;
use crate::storage::SeriesStore;
use mvrv_analytics::{series_zscore, WINDOW_SIZE};
use mvrv_core::{RawPoint, RollingResponse};

/// 원시 시계열 캐시 키.
pub const RAW_SERIES_KEY: &str = "mvrv_historical_values";
/// 파생(롤링 Z-Score) 시계열 캐시 키.
pub const ROLLING_KEY: &str = "mvrv_2yr_rolling";

/// 파생 시계열 TTL: 24시간.
pub const TTL_ROLLING_SECS: u64 = 86_400;
/// 원시 시계열 TTL: 7일.
pub const TTL_HISTORICAL_SECS: u64 = 604_800;

/// 오케스트레이터 설정.
#[derive(Debug, Clone)]
pub struct RollingServiceConfig {
    /// 업스트림 조회 시작일 (기본: 2012-01-01)
    pub start_date: NaiveDate,
    /// 원시 시계열 캐시 TTL (초)
    pub raw_ttl_secs: u64,
    /// 파생 시계열 캐시 TTL (초)
    pub derived_ttl_secs: u64,
}

impl Default for RollingServiceConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2012, 1, 1).expect("valid constant date"),
            raw_ttl_secs: TTL_HISTORICAL_SECS,
            derived_ttl_secs: TTL_ROLLING_SECS,
        }
    }
}

/// 롤링 Z-Score 갱신 오케스트레이터.
///
/// 저장소와 업스트림 소스를 트레이트 객체로 주입받아 테스트에서
/// 인메모리 대체 구현을 사용할 수 있습니다. 자체 상태가 없어
/// 여러 요청에서 동시에 호출해도 안전합니다.
pub struct RollingService {
    store: Arc<dyn SeriesStore>,
    source: Arc<dyn MvrvSource>,
    config: RollingServiceConfig,
}

impl RollingService {
    /// 기본 설정으로 오케스트레이터를 생성합니다.
    pub fn new(store: Arc<dyn SeriesStore>, source: Arc<dyn MvrvSource>) -> Self {
        Self {
            store,
            source,
            config: RollingServiceConfig::default(),
        }
    }

    /// 설정을 재정의합니다.
    pub fn with_config(mut self, config: RollingServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// 2YR 롤링 Z-Score 데이터셋을 반환합니다 (캐시 우선).
    ///
    /// `force_refresh`가 true면 파생 캐시를 무시하고 항상 다시
    /// 계산합니다 (스케줄 갱신 경로). 원시 캐시는 TTL이 유효하면
    /// 강제 갱신에서도 재사용됩니다.
    ///
    /// # Errors
    /// - [`DataError::InsufficientHistory`]: 원시 포인트가 731개 미만
    /// - [`DataError::FetchError`]: 업스트림 페치 실패 (재시도 없이 전파)
    pub async fn get_rolling(&self, force_refresh: bool) -> Result<RollingResponse> {
        if !force_refresh {
            if let Some(cached) = self.get_cached::<RollingResponse>(ROLLING_KEY).await {
                debug!("Returning cached 2YR rolling data");
                return Ok(cached);
            }
        }

        info!(force_refresh, "Cache miss or forced refresh - calculating fresh data");

        let historical = self.historical_values().await?;

        let required = WINDOW_SIZE + 1;
        if historical.len() < required {
            return Err(DataError::InsufficientHistory {
                required,
                provided: historical.len(),
            });
        }

        // 항상 전체 구간을 다시 계산합니다. 최신 포인트만 갱신하는
        // 증분 경로는 두지 않습니다 (재구성에 의한 정확성 보장).
        let data = series_zscore(&historical);
        info!(points = data.len(), "Calculated rolling Z-Score data points");

        let response = RollingResponse::new(data);
        self.put_cached(ROLLING_KEY, &response, self.config.derived_ttl_secs)
            .await;

        Ok(response)
    }

    /// 원시 MVRV 시계열을 반환합니다 (캐시 우선, 미스 시 업스트림 페치).
    async fn historical_values(&self) -> Result<Vec<RawPoint>> {
        if let Some(cached) = self.get_cached::<Vec<RawPoint>>(RAW_SERIES_KEY).await {
            debug!(points = cached.len(), "Returning cached historical MVRV values");
            return Ok(cached);
        }

        info!("Fetching fresh historical data from upstream");
        let end = Utc::now().date_naive();
        let fetched = self.source.fetch_series(self.config.start_date, end).await?;

        self.put_cached(RAW_SERIES_KEY, &fetched, self.config.raw_ttl_secs)
            .await;

        Ok(fetched)
    }

    /// 캐시에서 값을 읽어 역직렬화합니다.
    ///
    /// 저장소 오류와 파싱 오류는 캐시 미스로 취급합니다 (warn 로그).
    /// 캐시 장애가 요청을 실패시키면 안 됩니다.
    async fn get_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "Discarding unparseable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// 값을 직렬화해 캐시에 기록합니다. 실패는 warn 로그 후 무시합니다.
    async fn put_cached<T: Serialize>(&self, key: &str, value: &T, ttl_secs: u64) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache payload");
                return;
            }
        };

        if let Err(e) = self.store.put(key, &json, ttl_secs).await {
            warn!(key, error = %e, "Cache write failed, returning uncached result");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySeriesStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 고정된 시계열을 반환하며 호출 횟수를 기록하는 소스.
    struct StubSource {
        series: Vec<RawPoint>,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(series: Vec<RawPoint>) -> Self {
            Self {
                series,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MvrvSource for StubSource {
        async fn fetch_series(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<RawPoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.series.clone())
        }
    }

    /// 항상 페치에 실패하는 소스.
    struct FailingSource;

    #[async_trait]
    impl MvrvSource for FailingSource {
        async fn fetch_series(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<RawPoint>> {
            Err(DataError::FetchError("upstream down".to_string()))
        }
    }

    /// 읽기는 위임하고 쓰기는 항상 실패하는 저장소.
    struct WriteFailStore {
        inner: MemorySeriesStore,
    }

    #[async_trait]
    impl SeriesStore for WriteFailStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn put(&self, _key: &str, _value: &str, _ttl_secs: u64) -> Result<()> {
            Err(DataError::CacheError("disk full".to_string()))
        }
    }

    fn daily_series(len: usize) -> Vec<RawPoint> {
        let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        (0..len)
            .map(|i| {
                RawPoint::new(
                    start + Duration::days(i as i64),
                    1.0 + ((i * 13) % 17) as f64 * 0.11,
                )
            })
            .collect()
    }

    fn service_with(series: Vec<RawPoint>) -> (RollingService, Arc<StubSource>) {
        let source = Arc::new(StubSource::new(series));
        let service = RollingService::new(
            Arc::new(MemorySeriesStore::new()),
            source.clone() as Arc<dyn MvrvSource>,
        );
        (service, source)
    }

    #[tokio::test]
    async fn test_recompute_populates_both_caches() {
        let (service, source) = service_with(daily_series(WINDOW_SIZE + 10));

        let response = service.get_rolling(false).await.unwrap();
        assert_eq!(response.window, "730d");
        assert_eq!(response.data.len(), 10);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_fetch_and_is_idempotent() {
        let (service, source) = service_with(daily_series(WINDOW_SIZE + 10));

        let first = service.get_rolling(false).await.unwrap();
        let second = service.get_rolling(false).await.unwrap();

        // 두 번째 호출은 캐시 히트: 페치도 재계산도 없이 동일 페이로드
        assert_eq!(source.call_count(), 1);
        assert_eq!(first, second);
        assert_eq!(first.last_update, second.last_update);
    }

    #[tokio::test]
    async fn test_forced_refresh_always_rederives() {
        let (service, source) = service_with(daily_series(WINDOW_SIZE + 5));

        // 파생 캐시에 낡은 데이터가 유효한 TTL로 남아있는 상황
        let stale = RollingResponse::new(vec![]);
        let json = serde_json::to_string(&stale).unwrap();
        service.store.put(ROLLING_KEY, &json, 3600).await.unwrap();

        let response = service.get_rolling(true).await.unwrap();

        // 낡은 캐시가 아니라 새로 계산된 결과가 반환되어야 함
        assert_eq!(response.data.len(), 5);
        assert_eq!(source.call_count(), 1);

        // 이후 일반 조회는 갱신된 캐시를 반환
        let cached = service.get_rolling(false).await.unwrap();
        assert_eq!(cached, response);
    }

    #[tokio::test]
    async fn test_forced_refresh_reuses_valid_raw_cache() {
        let (service, source) = service_with(daily_series(WINDOW_SIZE + 5));

        service.get_rolling(false).await.unwrap();
        service.get_rolling(true).await.unwrap();

        // 원시 캐시 TTL이 유효하므로 강제 갱신도 재페치하지 않음
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_history_is_fatal() {
        // 정확히 730개: 엔진은 빈 결과를 내지만 오케스트레이터는 실패해야 함
        let (service, _source) = service_with(daily_series(WINDOW_SIZE));

        let err = service.get_rolling(false).await.unwrap_err();
        assert!(matches!(
            err,
            DataError::InsufficientHistory {
                required: 731,
                provided: 730
            }
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let service = RollingService::new(
            Arc::new(MemorySeriesStore::new()),
            Arc::new(FailingSource),
        );

        let err = service.get_rolling(false).await.unwrap_err();
        assert!(matches!(err, DataError::FetchError(_)));
    }

    #[tokio::test]
    async fn test_cache_write_failure_still_returns_result() {
        let source = Arc::new(StubSource::new(daily_series(WINDOW_SIZE + 3)));
        let service = RollingService::new(
            Arc::new(WriteFailStore {
                inner: MemorySeriesStore::new(),
            }),
            source.clone() as Arc<dyn MvrvSource>,
        );

        // 캐시 기록이 전부 실패해도 계산 결과는 반환되어야 함
        let response = service.get_rolling(false).await.unwrap();
        assert_eq!(response.data.len(), 3);

        // 캐시가 비어있으므로 다음 호출은 다시 페치
        service.get_rolling(false).await.unwrap();
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_treated_as_miss() {
        let (service, source) = service_with(daily_series(WINDOW_SIZE + 2));

        service
            .store
            .put(ROLLING_KEY, "not json {", 3600)
            .await
            .unwrap();

        let response = service.get_rolling(false).await.unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(source.call_count(), 1);
    }
}
