// Core engine exports
pub mod aggregate;
pub mod cursor;
pub mod identity;
pub mod matching;
pub mod place;
pub mod ratings;

pub use aggregate::{
    summarize_place_ratings, summarize_roommate_ratings, PlaceRatingsSummary, RatingAverages,
    RatingCounts, RoommateSummary,
};
pub use cursor::MessageCursor;
pub use identity::{normalize_phone, LandlordHasher};
pub use matching::{
    evaluate_listing_swipe, evaluate_user_swipe, ordered_pair, pair_key, pair_state, MatchState,
    SwipeOutcome,
};
pub use place::{coordinate_cell, place_key, DEFAULT_COORD_PRECISION};
pub use ratings::{validate_rating_group, validate_roommate_rating, MAX_SCORE, MIN_SCORE};
