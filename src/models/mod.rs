// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApartmentScores, LandlordScores, Listing, Match, Message, Place, PlaceRef, RateeRef,
    RatingGroup, RoommateRating, RoommateScores, SwipeAction, SwipeTargetType,
};
pub use requests::{
    CreateListingRequest, ListMessagesQuery, RoommateRatingRequest, SendMessageRequest,
    SubmitRatingRequest, SwipeRequest,
};
pub use responses::{
    CreateListingResponse, ErrorResponse, HealthResponse, MessagesPage, PlaceProfileResponse,
    RoommateRatingResponse, RoommateSummaryBody, SubmitRatingResponse, SwipeResponse,
    UserSummaryResponse,
};
