//! Coin Metrics Community API 클라이언트.
//!
//! BTC의 시가총액(CapMrktCurUSD)과 실현시가총액(CapRealUSD)을 받아
//! MVRV 비율을 계산합니다. Community API는 무료이며 페이지네이션
//! (`next_page_token`)과 요청 한도(6초당 10회)가 있습니다.
//!
//! # 데이터 정제 규칙
//!
//! - 필수 지표가 하나라도 없는 포인트는 조용히 제외
//! - MVRV = 시가총액 / 실현시가총액 (실현시가총액이 0 이하면 0)
//! - MVRV는 소수점 6자리, 가격은 2자리로 반올림
//! - 결과는 날짜 오름차순 정렬, 중복 날짜 제거

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::MvrvSource;
use crate::error::{DataError, Result};
use async_trait::async_trait;
use mvrv_core::RawPoint;

/// Community API 기본 엔드포인트.
const DEFAULT_BASE_URL: &str = "https://community-api.coinmetrics.io/v4/timeseries/asset-metrics";

/// 요청할 지표 목록.
const METRICS: &str = "CapMrktCurUSD,CapRealUSD,PriceUSD";

/// Coin Metrics 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct CoinMetricsConfig {
    /// API 엔드포인트 (테스트에서 교체 가능)
    pub base_url: String,
    /// 조회할 자산 (기본: "btc")
    pub asset: String,
    /// 페이지당 레코드 수 (Community API 최대: 1000)
    pub page_size: u32,
    /// 페이지 간 딜레이 (기본: 600ms = 6초당 10회 제한 준수)
    pub page_delay: Duration,
}

impl Default for CoinMetricsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            asset: "btc".to_string(),
            page_size: 1000,
            page_delay: Duration::from_millis(600),
        }
    }
}

impl CoinMetricsConfig {
    /// 환경변수에서 설정을 로드합니다.
    ///
    /// - `COINMETRICS_BASE_URL`: API 엔드포인트 재정의
    /// - `COINMETRICS_PAGE_DELAY_MS`: 페이지 간 딜레이 (밀리초)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("COINMETRICS_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(delay_ms) = std::env::var("COINMETRICS_PAGE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.page_delay = Duration::from_millis(delay_ms);
        }

        config
    }
}

/// Coin Metrics API 응답.
#[derive(Debug, Deserialize)]
struct CoinMetricsResponse {
    data: Vec<CoinMetricsRow>,
    next_page_token: Option<String>,
}

/// 응답의 일별 레코드. 지표는 문자열로 내려오며 결측 시 필드가 빠집니다.
#[derive(Debug, Deserialize)]
struct CoinMetricsRow {
    time: String,
    #[serde(rename = "CapMrktCurUSD")]
    cap_mrkt_cur_usd: Option<String>,
    #[serde(rename = "CapRealUSD")]
    cap_real_usd: Option<String>,
    #[serde(rename = "PriceUSD")]
    price_usd: Option<String>,
}

/// f64 값을 소수점 6자리로 반올림 (MVRV 비율용).
fn round_dp6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// f64 값을 소수점 2자리로 반올림 (가격용).
fn round_dp2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Coin Metrics Community API 클라이언트.
#[derive(Clone)]
pub struct CoinMetricsClient {
    client: reqwest::Client,
    config: CoinMetricsConfig,
}

impl CoinMetricsClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: CoinMetricsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// 한 페이지를 요청합니다.
    async fn fetch_page(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        page_token: Option<&str>,
    ) -> Result<CoinMetricsResponse> {
        let mut request = self.client.get(&self.config.base_url).query(&[
            ("assets", self.config.asset.as_str()),
            ("metrics", METRICS),
            ("start_time", &start.to_string()),
            ("end_time", &end.to_string()),
            ("page_size", &self.config.page_size.to_string()),
        ]);

        if let Some(token) = page_token {
            request = request.query(&[("next_page_token", token)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(DataError::FetchError(format!(
                "Coin Metrics API error: {}",
                response.status()
            )));
        }

        Ok(response.json::<CoinMetricsResponse>().await?)
    }

    /// 레코드 하나를 RawPoint로 변환합니다.
    ///
    /// 필수 지표가 없거나 파싱할 수 없으면 `None`을 반환해 제외시킵니다.
    fn convert_row(row: &CoinMetricsRow) -> Option<RawPoint> {
        let market_cap: f64 = row.cap_mrkt_cur_usd.as_deref()?.parse().ok()?;
        let realized_cap: f64 = row.cap_real_usd.as_deref()?.parse().ok()?;
        let price: f64 = row.price_usd.as_deref()?.parse().ok()?;

        // "2024-01-15T00:00:00.000000000Z" → "2024-01-15"
        let date: NaiveDate = row.time.split('T').next()?.parse().ok()?;

        let mvrv = if realized_cap > 0.0 {
            market_cap / realized_cap
        } else {
            0.0
        };

        Some(RawPoint {
            date,
            mvrv: round_dp6(mvrv),
            market_cap: Some(market_cap),
            realized_cap: Some(realized_cap),
            price: Some(round_dp2(price)),
        })
    }
}

#[async_trait]
impl MvrvSource for CoinMetricsClient {
    async fn fetch_series(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawPoint>> {
        info!(%start, %end, "Fetching MVRV data from Coin Metrics");

        let mut all_points: Vec<RawPoint> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(start, end, page_token.as_deref()).await?;

            let before = all_points.len();
            all_points.extend(page.data.iter().filter_map(Self::convert_row));

            debug!(
                page_rows = page.data.len(),
                kept = all_points.len() - before,
                total = all_points.len(),
                "Fetched Coin Metrics page"
            );

            match page.next_page_token {
                Some(token) => {
                    page_token = Some(token);
                    // 요청 한도 준수
                    tokio::time::sleep(self.config.page_delay).await;
                }
                None => break,
            }
        }

        // 업스트림 순서를 신뢰하지 않고 항상 정렬/중복 제거
        all_points.sort_by_key(|p| p.date);
        all_points.dedup_by_key(|p| p.date);

        info!(points = all_points.len(), "Total MVRV data points fetched");

        Ok(all_points)
    }
}
