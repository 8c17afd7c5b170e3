use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::core::vocabulary;
use crate::models::{AgeRange, Answers, Gender, Profile, QuestionKey, SyntheticProfile};
use crate::services::pool_store::{FallbackPoolStore, PoolStoreError};

/// Most substitute profiles handed out per call
pub const FALLBACK_COUNT: usize = 10;

/// Draws per batch slot before giving up on finding an unused name
const MAX_NAME_ATTEMPTS: usize = 5;

const SYNTHETIC_AGE_MIN: u8 = 21;
const SYNTHETIC_AGE_MAX: u8 = 34;
const SYNTHETIC_AGE_RANGE: AgeRange = AgeRange::new(21, 40);

/// Errors that can occur while supplying fallback profiles
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("Pool store error: {0}")]
    Store(#[from] PoolStoreError),

    #[error("Random source unavailable")]
    RandomSource,
}

/// Builds synthetic profiles from fixed per-gender vocabularies
///
/// The shape is always the same; only the content is random. A seeded
/// generator produces the same sequence of profiles on every run.
pub struct ProfileGenerator {
    rng: Mutex<StdRng>,
}

impl ProfileGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Generate up to `count` profiles of `gender` with distinct usernames
    ///
    /// A slot that cannot find an unused name within a few draws is skipped,
    /// so the batch may come back short.
    pub fn generate_batch(
        &self,
        gender: Gender,
        count: usize,
    ) -> Result<Vec<SyntheticProfile>, FallbackError> {
        let mut rng = self.rng.lock().map_err(|_| FallbackError::RandomSource)?;
        let mut used_names = HashSet::new();
        let mut batch = Vec::with_capacity(count);

        for _ in 0..count {
            let unused = (0..MAX_NAME_ATTEMPTS)
                .map(|_| generate_profile(&mut *rng, gender))
                .find(|candidate| !used_names.contains(&candidate.profile.username));

            if let Some(profile) = unused {
                used_names.insert(profile.profile.username.clone());
                batch.push(profile);
            }
        }

        Ok(batch)
    }

    fn shuffle_sample(
        &self,
        pool: Vec<SyntheticProfile>,
        count: usize,
    ) -> Result<Vec<Profile>, FallbackError> {
        let mut rng = self.rng.lock().map_err(|_| FallbackError::RandomSource)?;
        let mut sample: Vec<Profile> = pool
            .choose_multiple(&mut *rng, count)
            .map(|synthetic| synthetic.profile.clone())
            .collect();
        sample.shuffle(&mut *rng);
        Ok(sample)
    }
}

/// Build one synthetic profile of the given gender
pub fn generate_profile<R: Rng + ?Sized>(rng: &mut R, gender: Gender) -> SyntheticProfile {
    let words = vocabulary::for_gender(gender);

    let mut answers = Answers::default();
    answers.set(QuestionKey::Hobby, pick(rng, words.hobbies));
    answers.set(QuestionKey::Music, pick(rng, words.music));
    answers.set(QuestionKey::Travel, pick(rng, words.travel));
    answers.set(QuestionKey::Food, pick(rng, words.food));

    SyntheticProfile {
        profile: Profile {
            id: format!("synthetic_{}", uuid::Uuid::new_v4()),
            username: pick(rng, words.names),
            bio: pick(rng, words.bios),
            gender,
            gender_seeking: counterpart(gender),
            age: rng.gen_range(SYNTHETIC_AGE_MIN..=SYNTHETIC_AGE_MAX),
            answers,
            age_range_preference: Some(SYNTHETIC_AGE_RANGE),
        },
        created_at: chrono::Utc::now(),
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, list: &[&str]) -> String {
    list.choose(rng).copied().unwrap_or_default().to_string()
}

/// Gender a synthetic profile of `gender` is set up to seek
fn counterpart(gender: Gender) -> Gender {
    match gender {
        Gender::Female => Gender::Male,
        Gender::Male => Gender::Female,
        Gender::Other => Gender::Other,
    }
}

/// Substitute candidate supplier used when honest matching finds nothing
pub struct FallbackSupplier {
    store: Arc<dyn FallbackPoolStore>,
    generator: ProfileGenerator,
}

impl FallbackSupplier {
    pub fn new(store: Arc<dyn FallbackPoolStore>, generator: ProfileGenerator) -> Self {
        Self { store, generator }
    }

    /// Up to 10 synthetic profiles whose gender is `gender_seeking`
    ///
    /// Never fails: any storage or generation problem yields an empty list.
    pub async fn fallback(&self, gender_seeking: Gender) -> Vec<Profile> {
        match self.try_fallback(gender_seeking).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("Fallback supply for {} failed: {}", gender_seeking, e);
                Vec::new()
            }
        }
    }

    async fn try_fallback(&self, gender: Gender) -> Result<Vec<Profile>, FallbackError> {
        let mut pool = self.store.load(gender).await?;

        if pool.len() < FALLBACK_COUNT {
            let generated = self
                .generator
                .generate_batch(gender, FALLBACK_COUNT - pool.len())?;
            tracing::info!(
                "Fallback pool for {} has {} profiles, generated {} more",
                gender,
                pool.len(),
                generated.len()
            );

            // a failed write is logged; the fresh profiles are still served
            if let Err(e) = self.store.append(&generated).await {
                tracing::warn!("Failed to persist generated fallback profiles: {}", e);
            }
            pool.extend(generated);
        }

        let sample = self.generator.shuffle_sample(pool, FALLBACK_COUNT)?;
        tracing::debug!(
            "Supplying {} fallback profiles for {}",
            sample.len(),
            gender
        );
        Ok(sample)
    }
}
