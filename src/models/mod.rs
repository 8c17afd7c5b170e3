// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AgeRange, Answers, Gender, Profile, QuestionKey, SyntheticProfile, DEFAULT_AGE_RANGE,
};
pub use requests::{FallbackRequest, RankRequest};
pub use responses::{ErrorResponse, HealthResponse, RankResponse};
