use crate::models::{Gender, SyntheticProfile};
use crate::services::pool_store::{FallbackPoolStore, PoolStoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;

/// Redis-backed fallback pool shared across instances
///
/// Each gender is one hash (`<prefix>:<gender>`) with one field per profile
/// id. Appends are `HSET`s, so concurrent writers merge instead of
/// overwriting each other.
pub struct RedisPoolStore {
    // Store ConnectionManager in a Mutex for interior mutability
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    key_prefix: String,
}

impl RedisPoolStore {
    /// Connect to Redis
    pub async fn new(
        redis_url: &str,
        key_prefix: impl Into<String>,
    ) -> Result<Self, PoolStoreError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            key_prefix: key_prefix.into(),
        })
    }
}

#[async_trait]
impl FallbackPoolStore for RedisPoolStore {
    async fn load(&self, gender: Gender) -> Result<Vec<SyntheticProfile>, PoolStoreError> {
        let key = PoolKey::gender(&self.key_prefix, gender);

        let mut conn = self.redis.lock().await;
        let values: Vec<String> = redis::cmd("HVALS")
            .arg(&key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        let mut profiles = Vec::with_capacity(values.len());
        for json in values {
            match serde_json::from_str::<SyntheticProfile>(&json) {
                Ok(profile) => profiles.push(profile),
                Err(e) => tracing::warn!("Skipping unreadable fallback profile in {}: {}", key, e),
            }
        }
        profiles.sort_by(|a, b| a.profile.id.cmp(&b.profile.id));

        tracing::trace!("Loaded {} fallback profiles from {}", profiles.len(), key);
        Ok(profiles)
    }

    async fn append(&self, profiles: &[SyntheticProfile]) -> Result<(), PoolStoreError> {
        if profiles.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        for profile in profiles {
            let key = PoolKey::gender(&self.key_prefix, profile.profile.gender);
            let json = serde_json::to_string(profile)?;
            pipe.cmd("HSET")
                .arg(key)
                .arg(&profile.profile.id)
                .arg(json)
                .ignore();
        }

        let mut conn = self.redis.lock().await;
        let _: () = pipe.query_async(&mut *conn).await?;
        drop(conn);

        tracing::debug!("Stored {} fallback profiles in Redis", profiles.len());
        Ok(())
    }

    async fn count(&self, gender: Gender) -> Result<usize, PoolStoreError> {
        let mut conn = self.redis.lock().await;
        let count: usize = redis::cmd("HLEN")
            .arg(PoolKey::gender(&self.key_prefix, gender))
            .query_async(&mut *conn)
            .await?;
        Ok(count)
    }
}

/// Pool key builder
pub struct PoolKey;

impl PoolKey {
    /// Build the hash key holding one gender's profiles
    pub fn gender(prefix: &str, gender: Gender) -> String {
        format!("{}:{}", prefix, gender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answers, Profile};

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_append_and_load() {
        let store = RedisPoolStore::new("redis://127.0.0.1:6379", "test:fallback")
            .await
            .expect("Failed to connect to Redis");

        let id = format!("synthetic_{}", uuid::Uuid::new_v4());
        let profile = SyntheticProfile {
            profile: Profile {
                id: id.clone(),
                username: "Ira".to_string(),
                bio: "Test bio".to_string(),
                gender: Gender::Female,
                gender_seeking: Gender::Male,
                age: 24,
                answers: Answers::default(),
                age_range_preference: None,
            },
            created_at: chrono::Utc::now(),
        };

        store.append(&[profile]).await.unwrap();
        let loaded = store.load(Gender::Female).await.unwrap();
        assert!(loaded.iter().any(|p| p.profile.id == id));
    }

    #[test]
    fn test_pool_key_builder() {
        assert_eq!(
            PoolKey::gender("fallback:profiles", Gender::Female),
            "fallback:profiles:female"
        );
        assert_eq!(PoolKey::gender("fb", Gender::Other), "fb:other");
    }
}
