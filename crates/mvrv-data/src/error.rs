//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 캐시 오류
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 업스트림 데이터 가져오기 오류
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 업스트림 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 과거 데이터 부족 (롤링 계산 불가)
    #[error("Insufficient historical data: required {required} points, got {provided}")]
    InsufficientHistory { required: usize, provided: usize },

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DataError {
    /// 재시도로 해소될 수 있는 오류인지 확인합니다.
    ///
    /// 캐시/업스트림 장애는 다음 요청이나 다음 스케줄 실행에서
    /// 자연스럽게 재시도됩니다. 이 레이어에서는 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::FetchError(_) | DataError::CacheError(_))
    }
}

impl From<redis::RedisError> for DataError {
    fn from(err: redis::RedisError) -> Self {
        DataError::CacheError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
