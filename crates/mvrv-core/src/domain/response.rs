//! API 응답 구조체.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DerivedPoint;

/// 롤링 윈도우 식별자 ("730d" = 2년).
pub const WINDOW_LABEL: &str = "730d";

/// 2YR 롤링 Z-Score 전체 데이터셋 응답.
///
/// 파생 시계열 캐시에 그대로 직렬화되어 저장되며,
/// 캐시 히트 시 저장된 페이로드가 변경 없이 반환됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingResponse {
    /// 윈도우 식별자 (항상 "730d")
    pub window: String,
    /// 마지막 계산 시각 (ISO 8601)
    pub last_update: DateTime<Utc>,
    /// 날짜 오름차순 파생 포인트 목록
    pub data: Vec<DerivedPoint>,
}

impl RollingResponse {
    /// 계산 결과로부터 응답을 생성합니다 (계산 시각 = 현재).
    pub fn new(data: Vec<DerivedPoint>) -> Self {
        Self {
            window: WINDOW_LABEL.to_string(),
            last_update: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_keys_are_camel_case() {
        let response = RollingResponse::new(vec![]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["window"], "730d");
        assert!(json.get("lastUpdate").is_some());
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
