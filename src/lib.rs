//! Kindred Match - compatibility matching engine for the Kindred dating app
//!
//! Given a seeker and a pool of candidate profiles, the engine keeps the
//! mutually eligible candidates (gender and age preferences, both ways),
//! scores them by semantic similarity of their bios and question answers plus
//! age closeness, and returns the best matches. When nothing clears the
//! compatibility threshold it hands out synthetic profiles instead.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    Embedding, FallbackSupplier, MatchResult, MatchSource, Matcher, ProfileGenerator, TextEmbedder,
};
pub use crate::models::{
    AgeRange, Answers, Gender, Profile, QuestionKey, RankRequest, RankResponse,
};
