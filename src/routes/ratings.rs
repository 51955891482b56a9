use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::{
    place_key, summarize_place_ratings, summarize_roommate_ratings, validate_rating_group,
    validate_roommate_rating,
};
use crate::error::CoreError;
use crate::models::{
    ErrorResponse, PlaceProfileResponse, RoommateRatingRequest, RoommateRatingResponse,
    RoommateSummaryBody, SubmitRatingRequest, SubmitRatingResponse, UserSummaryResponse,
};
use crate::routes::AppState;

/// Configure all rating-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ratings", web::post().to(submit_rating))
        .route("/roommate-ratings", web::post().to(submit_roommate_rating))
        .route("/places/{place_id}/profile", web::get().to(place_profile))
        .route(
            "/users/{user_id}/ratings-summary",
            web::get().to(user_ratings_summary),
        );
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Submit a rating group against a place
///
/// POST /api/v1/ratings
///
/// Validation happens entirely before any write: score ranges, the
/// at-least-one-score-set rule, and the place reference. The store write
/// is one transaction, so a rejected or failed submission leaves no
/// trace in a later profile read.
async fn submit_rating(
    state: web::Data<AppState>,
    req: web::Json<SubmitRatingRequest>,
) -> Result<HttpResponse, CoreError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    validate_rating_group(req.landlord_scores.as_ref(), req.apartment_scores.as_ref())?;
    let key = place_key(&req.place_ref, state.policy.coord_precision)?;

    // The raw phone number stops here; only its digest travels further
    let landlord_hash = req
        .landlord_phone
        .as_deref()
        .map(|phone| state.hasher.hash(phone));

    let rating_group_id = state
        .postgres
        .insert_rating_group(
            &req.author_id,
            &key,
            &req.place_ref,
            landlord_hash.as_deref(),
            req.landlord_scores.as_ref(),
            req.apartment_scores.as_ref(),
            req.comment.as_deref(),
        )
        .await?;

    tracing::info!("rating group {} submitted by {}", rating_group_id, req.author_id);

    Ok(HttpResponse::Ok().json(SubmitRatingResponse { rating_group_id }))
}

/// Rate a roommate
///
/// POST /api/v1/roommate-ratings
async fn submit_roommate_rating(
    state: web::Data<AppState>,
    req: web::Json<RoommateRatingRequest>,
) -> Result<HttpResponse, CoreError> {
    if let Err(errors) = req.validate() {
        return Ok(validation_failed(errors));
    }

    validate_roommate_rating(&req.rater_id, &req.ratee, &req.scores)?;

    let roommate_rating_id = state
        .postgres
        .insert_roommate_rating(&req.rater_id, &req.ratee, &req.scores, req.comment.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(RoommateRatingResponse { roommate_rating_id }))
}

/// Aggregated ratings profile of a place
///
/// GET /api/v1/places/{place_id}/profile
///
/// A place with no ratings returns zero counts and null averages, not an
/// error.
async fn place_profile(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, CoreError> {
    let place_id = path.into_inner();

    let place = state.postgres.get_place(place_id).await?;
    let groups = state.postgres.rating_groups_for_place(place_id).await?;

    let ratings = summarize_place_ratings(&groups, state.policy.recent_window);

    Ok(HttpResponse::Ok().json(PlaceProfileResponse { place, ratings }))
}

/// Roommate ratings summary for a user
///
/// GET /api/v1/users/{user_id}/ratings-summary
async fn user_ratings_summary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CoreError> {
    let user_id = path.into_inner();

    let ratings = state.postgres.roommate_ratings_for(&user_id).await?;
    let summary = summarize_roommate_ratings(&ratings);

    Ok(HttpResponse::Ok().json(UserSummaryResponse {
        user_id,
        ratings_summary: RoommateSummaryBody {
            roommate_avg: summary.roommate_avg,
            count: summary.count,
        },
    }))
}
