// Route exports
pub mod listings;
pub mod messages;
pub mod ratings;
pub mod swipes;

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::config::PolicySettings;
use crate::core::LandlordHasher;
use crate::models::HealthResponse;
use crate::services::PostgresClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub hasher: Arc<LandlordHasher>,
    pub policy: PolicySettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(ratings::configure)
            .configure(listings::configure)
            .configure(swipes::configure)
            .configure(messages::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
