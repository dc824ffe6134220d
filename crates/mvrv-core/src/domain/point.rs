//! 시계열 데이터 포인트.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 일별 MVRV 원시 데이터 포인트.
///
/// Ingestion Adapter가 생산하는 입력 시계열의 한 점입니다.
/// 날짜는 시계열 내에서 유일하며, 시계열은 날짜 오름차순으로 정렬되어야 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoint {
    /// 기준일 (UTC, "YYYY-MM-DD")
    pub date: NaiveDate,
    /// MVRV 비율 (시가총액 ÷ 실현시가총액, 소수점 6자리)
    pub mvrv: f64,
    /// 시가총액 (USD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// 실현시가총액 (USD)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realized_cap: Option<f64>,
    /// BTC 가격 (USD, 표시용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl RawPoint {
    /// 계산용 최소 필드만으로 포인트를 생성합니다 (주로 테스트용).
    pub fn new(date: NaiveDate, mvrv: f64) -> Self {
        Self {
            date,
            mvrv,
            market_cap: None,
            realized_cap: None,
            price: None,
        }
    }
}

/// 롤링 Z-Score가 계산된 파생 포인트.
///
/// 730일 윈도우가 온전히 선행하는 날짜에 대해서만 생성됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    /// 기준일 (UTC, "YYYY-MM-DD")
    pub date: NaiveDate,
    /// 2년(730일) 롤링 Z-Score (소수점 4자리)
    pub zscore: f64,
    /// 해당일 MVRV 비율 (소수점 4자리)
    pub mvrv: f64,
    /// BTC 가격 (USD, 가격 정보가 없으면 0)
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_point_serde_roundtrip() {
        let point = RawPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            mvrv: 1.834521,
            market_cap: Some(850_000_000_000.0),
            realized_cap: Some(463_400_000_000.0),
            price: Some(42_850.12),
        };

        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"date\":\"2024-01-15\""));
        assert!(json.contains("\"marketCap\""));

        let parsed: RawPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, point);
    }

    #[test]
    fn test_raw_point_optional_fields_omitted() {
        let point = RawPoint::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 2.0);
        let json = serde_json::to_string(&point).unwrap();
        assert!(!json.contains("marketCap"));
        assert!(!json.contains("price"));
    }

    #[test]
    fn test_derived_point_json_shape() {
        let point = DerivedPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            zscore: -0.4213,
            mvrv: 1.8345,
            price: 42_850.12,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["zscore"], -0.4213);
        assert_eq!(json["date"], "2024-01-15");
    }
}
