use crate::models::{Gender, SyntheticProfile};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur with fallback pool storage
#[derive(Debug, Error)]
pub enum PoolStoreError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Key-value store of synthetic profiles, keyed by profile id
///
/// Appends merge into the existing pool: concurrent writers never lose each
/// other's entries.
#[async_trait]
pub trait FallbackPoolStore: Send + Sync {
    /// All stored profiles whose own gender is `gender`
    async fn load(&self, gender: Gender) -> Result<Vec<SyntheticProfile>, PoolStoreError>;

    /// Add profiles to the pool
    async fn append(&self, profiles: &[SyntheticProfile]) -> Result<(), PoolStoreError>;

    /// Number of stored profiles for a gender
    async fn count(&self, gender: Gender) -> Result<usize, PoolStoreError> {
        Ok(self.load(gender).await?.len())
    }
}

/// Process-local fallback pool
#[derive(Default)]
pub struct InMemoryPoolStore {
    entries: RwLock<HashMap<String, SyntheticProfile>>,
}

impl InMemoryPoolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FallbackPoolStore for InMemoryPoolStore {
    async fn load(&self, gender: Gender) -> Result<Vec<SyntheticProfile>, PoolStoreError> {
        let entries = self.entries.read().await;
        let mut profiles: Vec<SyntheticProfile> = entries
            .values()
            .filter(|p| p.profile.gender == gender)
            .cloned()
            .collect();
        // HashMap order is arbitrary; keep loads stable
        profiles.sort_by(|a, b| a.profile.id.cmp(&b.profile.id));
        Ok(profiles)
    }

    async fn append(&self, profiles: &[SyntheticProfile]) -> Result<(), PoolStoreError> {
        let mut entries = self.entries.write().await;
        for profile in profiles {
            entries.insert(profile.profile.id.clone(), profile.clone());
        }
        tracing::trace!("Fallback pool now holds {} profiles", entries.len());
        Ok(())
    }
}
