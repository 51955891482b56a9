use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::aggregate::PlaceRatingsSummary;
use crate::models::domain::{Message, Place};

/// Response for the place profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceProfileResponse {
    pub place: Place,
    pub ratings: PlaceRatingsSummary,
}

/// Response for the user ratings summary endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummaryResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "ratingsSummary")]
    pub ratings_summary: RoommateSummaryBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoommateSummaryBody {
    #[serde(rename = "roommateAvg")]
    pub roommate_avg: Option<f64>,
    pub count: usize,
}

/// Response for a recorded swipe: `match_id` is null when this swipe
/// created no match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    #[serde(rename = "matchId")]
    pub match_id: Option<Uuid>,
}

/// Response for a submitted rating group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRatingResponse {
    #[serde(rename = "ratingGroupId")]
    pub rating_group_id: Uuid,
}

/// Response for a submitted roommate rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoommateRatingResponse {
    #[serde(rename = "roommateRatingId")]
    pub roommate_rating_id: Uuid,
}

/// Response for a created listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingResponse {
    #[serde(rename = "listingId")]
    pub listing_id: Uuid,
    #[serde(rename = "placeId")]
    pub place_id: Uuid,
}

/// One page of messages, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesPage {
    pub items: Vec<Message>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
