use futures::{FutureExt, StreamExt};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    embedder::TextEmbedder,
    fallback::FallbackSupplier,
    filters::is_eligible,
    scoring::{score_candidate, MIN_COMPATIBILITY},
};
use crate::models::Profile;

/// Most profiles returned by one ranking pass
pub const MAX_RESULTS: usize = 10;

const DEFAULT_SCORING_CONCURRENCY: usize = 16;

/// Errors that abort a ranking pass
///
/// The caller never sees these; [`Matcher::rank`] degrades to the fallback
/// supplier instead.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Scoring pipeline aborted: {0}")]
    PipelineAborted(String),
}

/// Where the returned profiles came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Ranked,
    Fallback,
}

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Profile>,
    pub total_candidates: usize,
    pub eligible_candidates: usize,
    pub source: MatchSource,
}

/// Candidate that cleared the compatibility threshold
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub compatibility: f64,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Self-exclusion and hard eligibility (gender + age, both directions)
/// 2. Bio, answer and age scoring of the survivors
/// 3. Threshold, stable sort, truncation to 10
/// 4. Fallback to synthetic profiles when nothing survives
#[derive(Clone)]
pub struct Matcher {
    embedder: Arc<TextEmbedder>,
    fallback: Arc<FallbackSupplier>,
    scoring_concurrency: usize,
}

impl Matcher {
    pub fn new(embedder: Arc<TextEmbedder>, fallback: Arc<FallbackSupplier>) -> Self {
        Self {
            embedder,
            fallback,
            scoring_concurrency: DEFAULT_SCORING_CONCURRENCY,
        }
    }

    /// Limit how many candidates are scored at once
    pub fn with_scoring_concurrency(mut self, concurrency: usize) -> Self {
        self.scoring_concurrency = concurrency.max(1);
        self
    }

    pub fn embedder(&self) -> &Arc<TextEmbedder> {
        &self.embedder
    }

    pub fn fallback(&self) -> &Arc<FallbackSupplier> {
        &self.fallback
    }

    /// Rank candidates for a seeker, at most 10 profiles
    ///
    /// Always terminates with some list: genuine matches when any clear the
    /// threshold, otherwise substitute profiles, possibly empty.
    pub async fn rank(&self, seeker: &Profile, candidates: &[Profile]) -> Vec<Profile> {
        self.rank_detailed(seeker, candidates).await.matches
    }

    /// Like [`Matcher::rank`], with bookkeeping about the pass
    pub async fn rank_detailed(&self, seeker: &Profile, candidates: &[Profile]) -> MatchResult {
        let total_candidates = candidates.len();
        let eligible: Vec<&Profile> = candidates
            .iter()
            .filter(|candidate| candidate.id != seeker.id)
            .filter(|candidate| is_eligible(seeker, candidate))
            .collect();
        let eligible_candidates = eligible.len();

        let scored = match self.score_all(seeker, eligible).await {
            Ok(scored) => scored,
            Err(e) => {
                tracing::error!("Ranking failed for {}, using fallback: {}", seeker.id, e);
                Vec::new()
            }
        };

        if scored.is_empty() {
            let matches = self.fallback.fallback(seeker.gender_seeking).await;
            tracing::info!(
                "No match above {}% for {} ({} eligible of {}), returning {} fallback profiles",
                MIN_COMPATIBILITY,
                seeker.id,
                eligible_candidates,
                total_candidates,
                matches.len()
            );
            return MatchResult {
                matches,
                total_candidates,
                eligible_candidates,
                source: MatchSource::Fallback,
            };
        }

        tracing::info!(
            "Returning {} matches for {} ({} eligible of {})",
            scored.len(),
            seeker.id,
            eligible_candidates,
            total_candidates
        );

        MatchResult {
            matches: scored.into_iter().map(|s| s.profile).collect(),
            total_candidates,
            eligible_candidates,
            source: MatchSource::Ranked,
        }
    }

    /// Score, threshold, sort and truncate already-eligible candidates
    ///
    /// Scoring runs concurrently but results keep input order, so the stable
    /// sort breaks ties by position in the pool. A panic anywhere in the
    /// pipeline is reported as [`MatchError::PipelineAborted`].
    pub async fn score_all(
        &self,
        seeker: &Profile,
        eligible: Vec<&Profile>,
    ) -> Result<Vec<ScoredCandidate>, MatchError> {
        let pipeline = async {
            let pending: Vec<_> = eligible
                .into_iter()
                .map(|candidate| async move {
                    (
                        candidate,
                        score_candidate(&self.embedder, seeker, candidate).await,
                    )
                })
                .collect();
            let breakdowns: Vec<_> = futures::stream::iter(pending)
                .buffered(self.scoring_concurrency)
                .collect()
                .await;

            let mut retained: Vec<ScoredCandidate> = breakdowns
                .into_iter()
                .inspect(|(candidate, score)| {
                    tracing::trace!(
                        "{} -> {}: bio={:.3} answers={:.3} age={:.3} compatibility={:.2}",
                        seeker.id,
                        candidate.id,
                        score.bio,
                        score.answers,
                        score.age,
                        score.compatibility
                    );
                })
                .filter(|(_, score)| score.compatibility >= MIN_COMPATIBILITY)
                .map(|(candidate, score)| ScoredCandidate {
                    profile: candidate.clone(),
                    compatibility: score.compatibility,
                })
                .collect();

            // Vec::sort_by is stable
            retained.sort_by(|a, b| {
                b.compatibility
                    .partial_cmp(&a.compatibility)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            retained.truncate(MAX_RESULTS);
            retained
        };

        AssertUnwindSafe(pipeline)
            .catch_unwind()
            .await
            .map_err(|panic| MatchError::PipelineAborted(panic_message(panic.as_ref())))
    }

    /// Compatibility percentage of one pair, ignoring eligibility
    pub async fn compatibility(&self, seeker: &Profile, candidate: &Profile) -> f64 {
        score_candidate(&self.embedder, seeker, candidate)
            .await
            .compatibility
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
