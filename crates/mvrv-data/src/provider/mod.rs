//! 업스트림 데이터 제공자.
//!
//! 일별 MVRV 원시 시계열을 외부 소스에서 가져오는 Ingestion Adapter입니다.
//! 소스는 [`MvrvSource`] 트레이트로 추상화되어 오케스트레이터에 주입되며,
//! 운영 구현은 Coin Metrics Community API 클라이언트입니다.

pub mod coinmetrics;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use mvrv_core::RawPoint;

/// 일별 MVRV 시계열 소스.
///
/// 구현체는 날짜 오름차순으로 정렬되고 날짜 중복이 없는 시계열을
/// 반환해야 하며, 필수 지표가 빠진 포인트는 결과에서 제외해야 합니다.
#[async_trait]
pub trait MvrvSource: Send + Sync {
    /// `[start, end]` 구간의 일별 MVRV 시계열을 가져옵니다.
    async fn fetch_series(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawPoint>>;
}

pub use coinmetrics::{CoinMetricsClient, CoinMetricsConfig};
