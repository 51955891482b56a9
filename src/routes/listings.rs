use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::place_key;
use crate::error::CoreError;
use crate::models::{CreateListingRequest, CreateListingResponse, ErrorResponse};
use crate::routes::AppState;

/// Configure listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/listings", web::post().to(create_listing));
}

/// Create a listing against a resolved place
///
/// POST /api/v1/listings
async fn create_listing(
    state: web::Data<AppState>,
    req: web::Json<CreateListingRequest>,
) -> Result<HttpResponse, CoreError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    let key = place_key(&req.place_ref, state.policy.coord_precision)?;
    let place_id = state.postgres.resolve_place(&key, &req.place_ref).await?;

    let listing_id = state
        .postgres
        .insert_listing(&req.owner_id, place_id, &req.title, req.auto_accept)
        .await?;

    tracing::info!(
        "listing {} created by {} (auto_accept: {})",
        listing_id,
        req.owner_id,
        req.auto_accept
    );

    Ok(HttpResponse::Ok().json(CreateListingResponse { listing_id, place_id }))
}
