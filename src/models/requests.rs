use crate::models::domain::{Gender, Profile};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Request to rank a candidate pool for a seeker
///
/// The caller sources the pool from its own storage, typically
/// "every profile except the seeker".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRequest {
    pub seeker: Profile,
    #[serde(default)]
    pub candidates: Vec<Profile>,
}

impl RankRequest {
    /// Validate the seeker and every candidate at the ingestion boundary
    pub fn validate_profiles(&self) -> Result<(), ValidationErrors> {
        self.seeker.validate()?;
        for candidate in &self.candidates {
            candidate.validate()?;
        }
        Ok(())
    }
}

/// Request for substitute profiles when no genuine match exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRequest {
    #[serde(alias = "gender_seeking", rename = "genderSeeking")]
    pub gender_seeking: Gender,
}
