use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

pub(super) struct CacheEntry {
    pub(super) data: CacheData,
    /// `None` when the TTL does not fit in an `Instant`
    pub(super) expires_at: Option<Instant>,
}

pub(crate) struct InMemoryCacheStore {
    pub(super) entry: HashMap<String, CacheEntry>,
}

#[async_trait]
pub(crate) trait CacheStore: Send + Sync + 'static {
    /// Put a value into the store with a TTL in seconds.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get a value from the store. Expired values are not returned.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a value from the store.
    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;

    /// Number of entries held, expired or not.
    #[cfg(test)]
    fn len(&self) -> usize;
}
