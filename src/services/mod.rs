// Service exports
pub mod embedding_api;
pub mod pool_store;
pub mod redis_pool;

pub use embedding_api::{ConfiguredModelProvider, EmbeddingApiError, RemoteEmbeddingModel};
pub use pool_store::{FallbackPoolStore, InMemoryPoolStore, PoolStoreError};
pub use redis_pool::{PoolKey, RedisPoolStore};
