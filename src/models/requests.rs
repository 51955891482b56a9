use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ApartmentScores, LandlordScores, PlaceRef, RateeRef, RoommateScores};

/// Request to submit a rating group against a place
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRatingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "author_id", rename = "authorId")]
    pub author_id: String,
    #[serde(alias = "place_ref", rename = "placeRef")]
    pub place_ref: PlaceRef,
    #[serde(alias = "landlord_phone", rename = "landlordPhone", default)]
    pub landlord_phone: Option<String>,
    #[serde(alias = "landlord_scores", rename = "landlordScores", default)]
    pub landlord_scores: Option<LandlordScores>,
    #[serde(alias = "apartment_scores", rename = "apartmentScores", default)]
    pub apartment_scores: Option<ApartmentScores>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request to rate a roommate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoommateRatingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "rater_id", rename = "raterId")]
    pub rater_id: String,
    pub ratee: RateeRef,
    pub scores: RoommateScores,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request to record a swipe
///
/// `target_type` and `action` arrive as raw strings and are parsed in the
/// handler: an unknown target type surfaces as `InvalidTarget`, an unknown
/// action as an ordinary validation failure, neither as a generic
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "actor_id", rename = "actorId")]
    pub actor_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "targetType", rename = "targetType")]
    pub target_type: String,
    #[validate(length(min = 1))]
    #[serde(alias = "targetId", rename = "targetId")]
    pub target_id: String,
    #[validate(length(min = 1))]
    pub action: String,
}

/// Request to create a listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "owner_id", rename = "ownerId")]
    pub owner_id: String,
    #[serde(alias = "place_ref", rename = "placeRef")]
    pub place_ref: PlaceRef,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(alias = "auto_accept", rename = "autoAccept", default)]
    pub auto_accept: bool,
}

/// Request to send a message inside a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "sender_id", rename = "senderId")]
    pub sender_id: String,
    pub body: String,
}

/// Query parameters for the message list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}
