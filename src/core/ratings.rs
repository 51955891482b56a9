use crate::error::CoreError;
use crate::models::{ApartmentScores, LandlordScores, RateeRef, RoommateScores};

/// Inclusive score domain for every rated facet.
pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

fn check_facet(facet: &'static str, value: i16) -> Result<(), CoreError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidScore { facet })
    }
}

/// Validate a rating-group submission before anything touches the store.
///
/// Every supplied facet must be in [1,10] and at least one score set must
/// be present.
pub fn validate_rating_group(
    landlord: Option<&LandlordScores>,
    apartment: Option<&ApartmentScores>,
) -> Result<(), CoreError> {
    if landlord.is_none() && apartment.is_none() {
        return Err(CoreError::EmptyRating);
    }

    if let Some(scores) = landlord {
        for (facet, value) in scores.facets() {
            check_facet(facet, value)?;
        }
    }

    if let Some(scores) = apartment {
        for (facet, value) in scores.facets() {
            check_facet(facet, value)?;
        }
    }

    Ok(())
}

/// Validate a roommate rating: score ranges plus the self-rating check.
///
/// The self-rating rule only applies when the ratee is an account
/// reference; a free-text hint can never be proven to be the rater.
pub fn validate_roommate_rating(
    rater_id: &str,
    ratee: &RateeRef,
    scores: &RoommateScores,
) -> Result<(), CoreError> {
    if let RateeRef::User(ratee_id) = ratee {
        if ratee_id == rater_id {
            return Err(CoreError::SelfRating);
        }
    }

    for (facet, value) in scores.facets() {
        check_facet(facet, value)?;
    }

    Ok(())
}
