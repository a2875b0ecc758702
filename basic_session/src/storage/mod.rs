mod cache_store;
mod errors;
mod types;

pub(crate) use cache_store::{CacheStore, InMemoryCacheStore};
pub(crate) use errors::StorageError;
pub(crate) use types::CacheData;
