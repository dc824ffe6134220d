//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 유효한 빈 데이터셋과 실패 응답을 구분할 수 있도록
//! 실패는 항상 `code` 필드를 가진 에러 바디로 내려갑니다.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use mvrv_data::DataError;

/// 통합 API 에러 응답 바디.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INSUFFICIENT_HISTORY",
///   "message": "Insufficient historical data: required 731 points, got 412",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "UPSTREAM_FETCH_FAILED", "INSUFFICIENT_HISTORY")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// HTTP 상태 코드가 결정된 API 에러.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        let (status, code) = match &err {
            DataError::InsufficientHistory { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_HISTORY")
            }
            DataError::FetchError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FETCH_FAILED"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        Self {
            status,
            body: ApiErrorResponse::new(code, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// API 핸들러를 위한 Result 타입.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_history_maps_to_422() {
        let err: ApiError = DataError::InsufficientHistory {
            required: 731,
            provided: 412,
        }
        .into();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body.code, "INSUFFICIENT_HISTORY");
    }

    #[test]
    fn test_fetch_error_maps_to_502() {
        let err: ApiError = DataError::FetchError("timeout".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.body.code, "UPSTREAM_FETCH_FAILED");
    }

    #[test]
    fn test_cache_error_maps_to_500() {
        let err: ApiError = DataError::CacheError("down".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
