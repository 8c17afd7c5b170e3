// Core algorithm exports
pub mod embedder;
pub mod fallback;
pub mod filters;
pub mod hashed_model;
pub mod matcher;
pub mod scoring;
pub mod similarity;
pub mod vocabulary;

pub use embedder::{
    EmbedderError, EmbedderStats, Embedding, EmbeddingModel, ModelProvider, StaticModelProvider,
    TextEmbedder,
};
pub use fallback::{FallbackError, FallbackSupplier, ProfileGenerator, FALLBACK_COUNT};
pub use filters::{is_eligible, matches_age_preference, matches_gender_preference};
pub use hashed_model::HashedNgramModel;
pub use matcher::{MatchError, MatchResult, MatchSource, Matcher, ScoredCandidate, MAX_RESULTS};
pub use scoring::{
    age_compatibility, compatibility, score_candidate, ScoreBreakdown, AGE_WEIGHT, ANSWER_WEIGHT,
    BIO_WEIGHT, MIN_COMPATIBILITY,
};
pub use similarity::{
    answer_similarity, bio_similarity, cosine_similarity, similarity, text_similarity,
};
