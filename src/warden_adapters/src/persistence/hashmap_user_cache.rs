use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use tokio::time::Instant;
use warden_core::{Cache, CacheError};

/// Process-local cache with per-entry expiry. Expired entries are dropped on read.
#[derive(Default, Clone)]
pub struct HashMapUserCache {
    entries: Arc<DashMap<String, (Vec<u8>, Instant)>>,
}

impl HashMapUserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl Cache for HashMapUserCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.1 > now => return Ok(Some(entry.0.clone())),
            Some(_) => None,
            None => return Ok(None),
        };

        self.entries.remove_if(key, |_, (_, expires_at)| *expires_at <= now);
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_owned(), (value, Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
