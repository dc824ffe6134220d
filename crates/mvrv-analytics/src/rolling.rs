//! 730일 롤링 Z-Score 계산.
//!
//! 각 포인트의 Z-Score는 해당 포인트를 제외한 직전 730일 값의
//! 모집단 평균/표준편차(분모 = 730)로 계산됩니다.
//! 전체 시계열 계산은 포인트마다 윈도우를 다시 합산하는 O(n·W)
//! 방식입니다. 현재 데이터 규모(수천 포인트)에서는 충분히 빠르며,
//! 증분 합산 최적화는 의도적으로 적용하지 않았습니다.

use mvrv_core::{DerivedPoint, RawPoint};

use crate::{RollingError, RollingResult};

/// 롤링 윈도우 크기 (일 수). 2년 = 730일.
pub const WINDOW_SIZE: usize = 730;

/// f64 값을 소수점 4자리로 반올림.
fn round_dp4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 윈도우 크기 검증 없이 Z-Score를 계산합니다.
///
/// 호출자는 `window.len() == WINDOW_SIZE`를 보장해야 합니다.
fn zscore_unchecked(current: f64, window: &[f64]) -> f64 {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    // 윈도우 값이 모두 동일하면 표준편차가 0이 됩니다.
    // 0으로 나누는 대신 Z-Score 0을 반환하는 것이 정책입니다.
    if stddev == 0.0 {
        return 0.0;
    }

    round_dp4((current - mean) / stddev)
}

/// 단일 포인트의 2YR 롤링 Z-Score를 계산합니다.
///
/// # 인자
/// - `current`: 기준일의 MVRV 값
/// - `window`: 기준일 직전 730일의 MVRV 값 (기준일 제외, 날짜 오름차순)
///
/// # Errors
/// `window` 길이가 정확히 [`WINDOW_SIZE`]가 아니면
/// [`RollingError::InsufficientWindowData`]를 반환합니다.
pub fn point_zscore(current: f64, window: &[f64]) -> RollingResult<f64> {
    if window.len() != WINDOW_SIZE {
        return Err(RollingError::InsufficientWindowData {
            required: WINDOW_SIZE,
            provided: window.len(),
        });
    }

    Ok(zscore_unchecked(current, window))
}

/// 전체 시계열의 2YR 롤링 Z-Score를 계산합니다.
///
/// 입력은 날짜 오름차순으로 정렬되고 중복 날짜가 없어야 합니다.
/// 인덱스 730부터 마지막 포인트까지, 포인트마다 직전 730개 값을
/// 윈도우로 사용해 파생 포인트를 생성합니다.
///
/// 입력 길이가 731 미만이면 빈 Vec을 반환합니다 (오류 아님).
/// 결과 길이는 항상 `max(0, n - 730)`이며, 결과의 날짜는 입력의
/// 인덱스 730 이후 날짜와 순서까지 정확히 일치합니다.
pub fn series_zscore(series: &[RawPoint]) -> Vec<DerivedPoint> {
    if series.len() <= WINDOW_SIZE {
        return Vec::new();
    }

    let mut results = Vec::with_capacity(series.len() - WINDOW_SIZE);

    for i in WINDOW_SIZE..series.len() {
        let current = &series[i];
        let window: Vec<f64> = series[i - WINDOW_SIZE..i].iter().map(|p| p.mvrv).collect();

        results.push(DerivedPoint {
            date: current.date,
            zscore: zscore_unchecked(current.mvrv, &window),
            mvrv: round_dp4(current.mvrv),
            price: current.price.unwrap_or(0.0),
        });
    }

    results
}

/// 시계열의 가장 최근 포인트에 대한 Z-Score만 계산합니다.
///
/// 일일 업데이트처럼 최신 값 하나만 필요한 경우에 사용합니다.
/// 포인트가 731개(730일 윈도우 + 당일) 미만이면 `None`을 반환합니다.
pub fn latest_zscore(series: &[RawPoint]) -> Option<DerivedPoint> {
    if series.len() <= WINDOW_SIZE {
        return None;
    }

    let current = series.last()?;
    let start = series.len() - 1 - WINDOW_SIZE;
    let window: Vec<f64> = series[start..series.len() - 1]
        .iter()
        .map(|p| p.mvrv)
        .collect();

    Some(DerivedPoint {
        date: current.date,
        zscore: zscore_unchecked(current.mvrv, &window),
        mvrv: round_dp4(current.mvrv),
        price: current.price.unwrap_or(0.0),
    })
}
