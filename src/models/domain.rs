use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Gender tag used for both a profile's own gender and the gender it seeks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of profile questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKey {
    Hobby,
    Music,
    Travel,
    Food,
}

impl QuestionKey {
    pub const ALL: [QuestionKey; 4] = [
        QuestionKey::Hobby,
        QuestionKey::Music,
        QuestionKey::Travel,
        QuestionKey::Food,
    ];
}

/// Free-text answers keyed by question. Any answer may be absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobby: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<String>,
}

impl Answers {
    /// Answer text for a question, `None` when absent or blank
    pub fn get(&self, key: QuestionKey) -> Option<&str> {
        let answer = match key {
            QuestionKey::Hobby => self.hobby.as_deref(),
            QuestionKey::Music => self.music.as_deref(),
            QuestionKey::Travel => self.travel.as_deref(),
            QuestionKey::Food => self.food.as_deref(),
        };
        answer.filter(|text| !text.trim().is_empty())
    }

    pub fn set(&mut self, key: QuestionKey, answer: impl Into<String>) {
        let slot = match key {
            QuestionKey::Hobby => &mut self.hobby,
            QuestionKey::Music => &mut self.music,
            QuestionKey::Travel => &mut self.travel,
            QuestionKey::Food => &mut self.food,
        };
        *slot = Some(answer.into());
    }

    /// Builder-style variant of [`Answers::set`]
    pub fn with(mut self, key: QuestionKey, answer: impl Into<String>) -> Self {
        self.set(key, answer);
        self
    }
}

/// Inclusive age range a profile is willing to match with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Inverted ranges (min > max) admit nobody
    #[inline]
    pub fn contains(&self, age: u8) -> bool {
        age >= self.min && age <= self.max
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        DEFAULT_AGE_RANGE
    }
}

/// Applied when a profile states no age preference
pub const DEFAULT_AGE_RANGE: AgeRange = AgeRange::new(18, 50);

/// Seeker or candidate profile as supplied by the caller
///
/// The engine only ever reads profiles; it never mutates or persists the
/// ones it is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(rename = "genderSeeking", default)]
    pub gender_seeking: Gender,
    #[validate(range(min = 18))]
    pub age: u8,
    #[serde(default)]
    pub answers: Answers,
    #[serde(
        rename = "ageRangePreference",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub age_range_preference: Option<AgeRange>,
}

impl Profile {
    /// Stated age preference, or the default range when none was given
    pub fn age_range(&self) -> AgeRange {
        self.age_range_preference.unwrap_or_default()
    }
}

/// Synthetic profile held in the fallback pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticProfile {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}
