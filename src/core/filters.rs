use crate::models::Profile;

/// Hard eligibility check, run before any embedding work
///
/// Both the gender preference and the age-range preference must hold in
/// both directions; a one-sided match is not eligible. The check is
/// symmetric: `is_eligible(a, b) == is_eligible(b, a)`.
#[inline]
pub fn is_eligible(seeker: &Profile, candidate: &Profile) -> bool {
    matches_gender_preference(seeker, candidate) && matches_age_preference(seeker, candidate)
}

/// Each side seeks the other's gender
#[inline]
pub fn matches_gender_preference(seeker: &Profile, candidate: &Profile) -> bool {
    seeker.gender_seeking == candidate.gender && candidate.gender_seeking == seeker.gender
}

/// Each side's age falls inside the other's preferred range
#[inline]
pub fn matches_age_preference(seeker: &Profile, candidate: &Profile) -> bool {
    seeker.age_range().contains(candidate.age) && candidate.age_range().contains(seeker.age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeRange, Answers, Gender};

    fn create_test_profile(id: &str, age: u8, gender: Gender, seeking: Gender) -> Profile {
        Profile {
            id: id.to_string(),
            username: format!("User {}", id),
            bio: String::new(),
            gender,
            gender_seeking: seeking,
            age,
            answers: Answers::default(),
            age_range_preference: None,
        }
    }

    #[test]
    fn test_mutual_preference_eligible() {
        let seeker = create_test_profile("s", 25, Gender::Male, Gender::Female);
        let candidate = create_test_profile("c", 26, Gender::Female, Gender::Male);

        assert!(is_eligible(&seeker, &candidate));
    }

    #[test]
    fn test_one_sided_gender_preference_rejected() {
        let seeker = create_test_profile("s", 25, Gender::Male, Gender::Female);
        let candidate = create_test_profile("c", 26, Gender::Female, Gender::Female);

        assert!(!matches_gender_preference(&seeker, &candidate));
        assert!(!is_eligible(&seeker, &candidate));
    }

    #[test]
    fn test_default_age_range_applies() {
        let seeker = create_test_profile("s", 25, Gender::Other, Gender::Other);
        let candidate = create_test_profile("c", 51, Gender::Other, Gender::Other);

        assert!(!is_eligible(&seeker, &candidate));
    }

    #[test]
    fn test_age_preference_checked_both_ways() {
        let mut seeker = create_test_profile("s", 40, Gender::Female, Gender::Male);
        seeker.age_range_preference = Some(AgeRange::new(30, 45));
        let mut candidate = create_test_profile("c", 35, Gender::Male, Gender::Female);
        candidate.age_range_preference = Some(AgeRange::new(25, 38));

        // candidate fits the seeker's range, but the seeker is too old for the candidate
        assert!(seeker.age_range().contains(candidate.age));
        assert!(!matches_age_preference(&seeker, &candidate));
        assert!(!is_eligible(&seeker, &candidate));
        assert!(!is_eligible(&candidate, &seeker));
    }

    #[test]
    fn test_eligibility_is_symmetric() {
        let genders = Gender::ALL;
        let ages = [18u8, 30, 49, 50, 60];

        for &g1 in &genders {
            for &s1 in &genders {
                for &g2 in &genders {
                    for &s2 in &genders {
                        for &a1 in &ages {
                            for &a2 in &ages {
                                let a = create_test_profile("a", a1, g1, s1);
                                let b = create_test_profile("b", a2, g2, s2);
                                assert_eq!(is_eligible(&a, &b), is_eligible(&b, &a));
                            }
                        }
                    }
                }
            }
        }
    }
}
