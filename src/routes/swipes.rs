use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::{
    evaluate_listing_swipe, evaluate_user_swipe, ordered_pair, pair_key, SwipeOutcome,
};
use crate::error::CoreError;
use crate::models::{
    ErrorResponse, SwipeAction, SwipeRequest, SwipeResponse, SwipeTargetType,
};
use crate::routes::AppState;

/// Configure swipe routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/swipes", web::post().to(record_swipe));
}

/// Faults in the two string-typed swipe fields. A bad target type is an
/// unknown-target error; a bad action is an ordinary validation failure.
#[derive(Debug, PartialEq, Eq)]
enum SwipeFieldFault {
    UnknownTarget(String),
    UnknownAction(String),
}

fn parse_swipe_fields(
    target_type: &str,
    action: &str,
) -> Result<(SwipeTargetType, SwipeAction), SwipeFieldFault> {
    let target_type = SwipeTargetType::parse(target_type)
        .ok_or_else(|| SwipeFieldFault::UnknownTarget(target_type.to_string()))?;
    let action = SwipeAction::parse(action)
        .ok_or_else(|| SwipeFieldFault::UnknownAction(action.to_string()))?;

    Ok((target_type, action))
}

/// Record a swipe and run the match engine
///
/// POST /api/v1/swipes
///
/// The swipe upsert and the reciprocal check are separate reads, but
/// match creation itself is conflict-as-success on the pair key, so two
/// users liking each other in the same instant still produce exactly one
/// match. The response carries the match id when this swipe completed a
/// pair, and null otherwise.
async fn record_swipe(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
) -> Result<HttpResponse, CoreError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let (target_type, action) = match parse_swipe_fields(&req.target_type, &req.action) {
        Ok(parsed) => parsed,
        Err(SwipeFieldFault::UnknownTarget(value)) => {
            return Err(CoreError::InvalidTarget(value));
        }
        Err(SwipeFieldFault::UnknownAction(value)) => {
            return Ok(HttpResponse::BadRequest().json(ErrorResponse {
                error: "validation_failed".to_string(),
                message: format!("unknown swipe action: {value}"),
                status_code: 400,
            }));
        }
    };

    let match_id = match target_type {
        SwipeTargetType::User => {
            swipe_on_user(&state, &req.actor_id, &req.target_id, action).await?
        }
        SwipeTargetType::Listing => {
            swipe_on_listing(&state, &req.actor_id, &req.target_id, action).await?
        }
    };

    Ok(HttpResponse::Ok().json(SwipeResponse { match_id }))
}

/// Swipe on a roommate candidate.
///
/// A LIKE matches when the reciprocal USER like exists; failing that, a
/// LIKE the target previously recorded on one of the actor's listings
/// completes that listing's pair instead (the owner accepting a
/// candidate back).
async fn swipe_on_user(
    state: &AppState,
    actor_id: &str,
    target_id: &str,
    action: SwipeAction,
) -> Result<Option<Uuid>, CoreError> {
    state
        .postgres
        .record_swipe(actor_id, SwipeTargetType::User, target_id, action)
        .await?;

    // A swipe at oneself never participates in matching
    if actor_id == target_id || action != SwipeAction::Like {
        return Ok(None);
    }

    let reciprocal = state
        .postgres
        .get_swipe(target_id, SwipeTargetType::User, actor_id)
        .await?;

    if evaluate_user_swipe(action, reciprocal) == SwipeOutcome::CreateMatch {
        let key = pair_key(actor_id, target_id, SwipeTargetType::User);
        let (low, high) = ordered_pair(actor_id, target_id);

        let match_id = state
            .postgres
            .create_match_if_absent(&key, low, high, SwipeTargetType::User, None)
            .await?;

        return Ok(Some(match_id));
    }

    // Owner accepting a candidate who liked one of their listings
    if let Some(listing_id) = state.postgres.find_listing_like(target_id, actor_id).await? {
        if evaluate_listing_swipe(SwipeAction::Like, false, Some(action))
            == SwipeOutcome::CreateMatch
        {
            let key = pair_key(actor_id, target_id, SwipeTargetType::Listing);
            let (low, high) = ordered_pair(actor_id, target_id);

            let match_id = state
                .postgres
                .create_match_if_absent(&key, low, high, SwipeTargetType::Listing, Some(listing_id))
                .await?;

            return Ok(Some(match_id));
        }
    }

    Ok(None)
}

/// Swipe on a listing. The pair is (swiper, listing owner); an
/// auto-accept listing matches on the LIKE alone.
async fn swipe_on_listing(
    state: &AppState,
    actor_id: &str,
    target_id: &str,
    action: SwipeAction,
) -> Result<Option<Uuid>, CoreError> {
    let listing_id =
        Uuid::parse_str(target_id).map_err(|_| CoreError::ListingNotFound)?;
    let listing = state.postgres.get_listing(listing_id).await?;

    state
        .postgres
        .record_swipe(actor_id, SwipeTargetType::Listing, target_id, action)
        .await?;

    // Owners swiping their own listing never match themselves
    if actor_id == listing.owner_id || action != SwipeAction::Like {
        return Ok(None);
    }

    let owner_reciprocal = state
        .postgres
        .get_swipe(&listing.owner_id, SwipeTargetType::User, actor_id)
        .await?;

    if evaluate_listing_swipe(action, listing.auto_accept, owner_reciprocal)
        == SwipeOutcome::CreateMatch
    {
        let key = pair_key(actor_id, &listing.owner_id, SwipeTargetType::Listing);
        let (low, high) = ordered_pair(actor_id, &listing.owner_id);

        let match_id = state
            .postgres
            .create_match_if_absent(&key, low, high, SwipeTargetType::Listing, Some(listing.id))
            .await?;

        return Ok(Some(match_id));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_parse() {
        assert_eq!(
            parse_swipe_fields("USER", "LIKE"),
            Ok((SwipeTargetType::User, SwipeAction::Like))
        );
        assert_eq!(
            parse_swipe_fields("LISTING", "PASS"),
            Ok((SwipeTargetType::Listing, SwipeAction::Pass))
        );
    }

    #[test]
    fn test_unknown_target_type_is_a_target_fault() {
        assert_eq!(
            parse_swipe_fields("GROUP", "LIKE"),
            Err(SwipeFieldFault::UnknownTarget("GROUP".to_string()))
        );
    }

    #[test]
    fn test_unknown_action_is_not_a_target_fault() {
        assert_eq!(
            parse_swipe_fields("USER", "SUPERLIKE"),
            Err(SwipeFieldFault::UnknownAction("SUPERLIKE".to_string()))
        );
    }
}
