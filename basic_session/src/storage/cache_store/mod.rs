mod memory;
mod types;

pub(crate) use types::{CacheStore, InMemoryCacheStore};
