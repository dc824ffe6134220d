//! # MVRV Analytics
//!
//! 2년(730일) 롤링 윈도우 Z-Score 계산 엔진입니다.
//!
//! 표준 Z-Score와의 차이:
//! - 표준: (MVRV - 전체 기간 평균) / 전체 기간 표준편차
//! - 2YR 롤링: (MVRV - 직전 730일 평균) / 직전 730일 표준편차
//!
//! 모든 연산은 순수 함수이며 공유 상태가 없습니다.
//! 서로 다른 입력에 대해 동시에 호출해도 안전합니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use mvrv_analytics::rolling::{series_zscore, WINDOW_SIZE};
//!
//! // raw는 날짜 오름차순으로 정렬된 일별 MVRV 시계열
//! let derived = series_zscore(&raw);
//! assert_eq!(derived.len(), raw.len().saturating_sub(WINDOW_SIZE));
//! ```

pub mod rolling;

use thiserror::Error;

/// 롤링 통계 계산 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RollingError {
    /// 윈도우 데이터 부족 오류.
    ///
    /// 호출자 계약 위반입니다. 오케스트레이터는 항상 정확히
    /// `WINDOW_SIZE` 길이의 윈도우를 잘라 전달하므로, 운영 중에
    /// 관측되면 결함으로 취급합니다.
    #[error("윈도우 데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientWindowData { required: usize, provided: usize },
}

/// 롤링 통계 계산을 위한 Result 타입.
pub type RollingResult<T> = Result<T, RollingError>;

pub use rolling::{latest_zscore, point_zscore, series_zscore, WINDOW_SIZE};
