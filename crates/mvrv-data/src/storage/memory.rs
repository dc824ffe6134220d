//! 인메모리 시계열 저장소.
//!
//! Redis 없이 동작해야 하는 환경(로컬 개발, 테스트)을 위한
//! [`SeriesStore`] 구현입니다. TTL 만료 동작은 Redis와 동일하게
//! 흉내냅니다. 프로세스가 내려가면 내용은 사라집니다.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::SeriesStore;
use crate::error::Result;

/// 만료 시각이 붙은 캐시 엔트리.
struct Entry {
    payload: String,
    expires_at: Instant,
}

/// 인메모리 key-value 저장소.
#[derive(Default)]
pub struct MemorySeriesStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySeriesStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeriesStore for MemorySeriesStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.payload.clone())),
            _ => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                payload: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemorySeriesStore::new();
        store.put("k", "{\"a\":1}", 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemorySeriesStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = MemorySeriesStore::new();
        store.put("k", "v", 0).await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_payload() {
        let store = MemorySeriesStore::new();
        store.put("k", "old", 60).await.unwrap();
        store.put("k", "new", 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
