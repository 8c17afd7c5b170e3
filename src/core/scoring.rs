use crate::core::embedder::TextEmbedder;
use crate::core::similarity::{answer_similarity, bio_similarity};
use crate::models::Profile;

/// Weight of bio similarity in the compatibility score
pub const BIO_WEIGHT: f64 = 0.3;
/// Weight of answer similarity in the compatibility score
pub const ANSWER_WEIGHT: f64 = 0.5;
/// Weight of age proximity in the compatibility score
pub const AGE_WEIGHT: f64 = 0.2;

/// Minimum compatibility (percent) a candidate needs to be returned
pub const MIN_COMPATIBILITY: f64 = 50.0;

/// Age gap (years) at which age proximity reaches zero
const AGE_DECAY_YEARS: f64 = 10.0;

/// Per-candidate score components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub bio: f64,
    pub answers: f64,
    pub age: f64,
    pub compatibility: f64,
}

/// Age proximity in [0, 1], decaying linearly to 0 at a 10-year gap
#[inline]
pub fn age_compatibility(a: u8, b: u8) -> f64 {
    let gap = (a as f64 - b as f64).abs();
    (1.0 - gap / AGE_DECAY_YEARS).max(0.0)
}

/// Weighted compatibility percentage
///
/// compatibility = 100 * (0.3 * bio + 0.5 * answers + 0.2 * age)
///
/// No rounding is applied; the raw value is compared with the threshold.
#[inline]
pub fn compatibility(bio: f64, answers: f64, age: f64) -> f64 {
    100.0 * (BIO_WEIGHT * bio + ANSWER_WEIGHT * answers + AGE_WEIGHT * age)
}

/// Score one candidate against the seeker
pub async fn score_candidate(
    embedder: &TextEmbedder,
    seeker: &Profile,
    candidate: &Profile,
) -> ScoreBreakdown {
    let (bio, answers) = futures::join!(
        bio_similarity(embedder, seeker, candidate),
        answer_similarity(embedder, &seeker.answers, &candidate.answers)
    );
    let age = age_compatibility(seeker.age, candidate.age);

    ScoreBreakdown {
        bio,
        answers,
        age,
        compatibility: compatibility(bio, answers, age),
    }
}
