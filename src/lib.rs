//! RantRoom Core - backend for the RantRoom roommate matching and rental
//! reputation platform.
//!
//! Two engines live here: the swipe/match state machine that turns
//! one-sided likes into exactly-once matches, and the ratings aggregation
//! pipeline that deduplicates places, validates submissions and computes
//! recency-aware profile summaries.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    pair_key, place_key, summarize_place_ratings, summarize_roommate_ratings, LandlordHasher,
};
pub use error::CoreError;
pub use models::{PlaceRef, RatingGroup, SwipeAction, SwipeTargetType};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let key = pair_key("b", "a", SwipeTargetType::User);
        assert_eq!(key, "USER:a:b");
    }
}
