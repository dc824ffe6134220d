//! 시계열 캐시 저장소.
//!
//! 원시/파생 시계열은 TTL이 있는 key-value 저장소에 JSON으로 보관됩니다.
//! 저장소는 [`SeriesStore`] 트레이트로 추상화되어 오케스트레이터에
//! 의존성으로 주입됩니다. 운영 환경에서는 Redis 구현을, 테스트나
//! Redis가 없는 환경에서는 인메모리 구현을 사용합니다.

pub mod memory;
pub mod redis;

use crate::error::Result;
use async_trait::async_trait;

/// TTL을 지원하는 key-value 시계열 저장소.
///
/// TTL 만료가 유일한 무효화 수단입니다. 명시적 무효화 API는 없습니다.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// 키에 저장된 JSON 페이로드를 가져옵니다. 없거나 만료되었으면 `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// JSON 페이로드를 TTL(초)과 함께 저장합니다.
    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;
}

pub use memory::MemorySeriesStore;
pub use redis::{RedisConfig, RedisSeriesStore};
