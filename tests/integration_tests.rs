// Integration tests for RantRoom core
//
// These drive the pure engines exactly the way the HTTP layer and the
// store do: swipes feed the state machine, match creation goes through a
// uniqueness check modeled like the store's pair-key constraint, and
// aggregation runs over accumulated rating groups.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use rantroom_core::core::{
    evaluate_listing_swipe, evaluate_user_swipe, pair_key, summarize_place_ratings,
    summarize_roommate_ratings, SwipeOutcome,
};
use rantroom_core::models::{
    ApartmentScores, RateeRef, RatingGroup, RoommateRating, RoommateScores, SwipeAction,
    SwipeTargetType,
};

/// In-memory stand-in for the swipe ledger plus the match table's unique
/// pair-key constraint: inserting an existing key is a no-op, mirroring
/// `ON CONFLICT DO NOTHING` treated as success.
#[derive(Default)]
struct TestLedger {
    swipes: HashMap<(String, String), SwipeAction>,
    matches: HashSet<String>,
}

impl TestLedger {
    fn swipe_user(&mut self, actor: &str, target: &str, action: SwipeAction) -> bool {
        self.swipes
            .insert((actor.to_string(), target.to_string()), action);

        let reciprocal = self.swipes.get(&(target.to_string(), actor.to_string())).copied();
        if evaluate_user_swipe(action, reciprocal) == SwipeOutcome::CreateMatch {
            self.matches.insert(pair_key(actor, target, SwipeTargetType::User));
        }

        self.matches
            .contains(&pair_key(actor, target, SwipeTargetType::User))
    }
}

#[test]
fn test_mutual_like_creates_exactly_one_match() {
    let mut ledger = TestLedger::default();

    assert!(!ledger.swipe_user("alice", "bob", SwipeAction::Like));
    assert!(ledger.swipe_user("bob", "alice", SwipeAction::Like));
    assert_eq!(ledger.matches.len(), 1);

    // A third like from either side cannot create a second match
    ledger.swipe_user("alice", "bob", SwipeAction::Like);
    ledger.swipe_user("bob", "alice", SwipeAction::Like);
    assert_eq!(ledger.matches.len(), 1);
}

#[test]
fn test_simultaneous_likes_collapse_onto_one_pair_key() {
    // Both swipes land before either sees the other's outcome; both
    // evaluate to CreateMatch and both inserts target the same key
    let mut ledger = TestLedger::default();
    ledger
        .swipes
        .insert(("alice".to_string(), "bob".to_string()), SwipeAction::Like);
    ledger
        .swipes
        .insert(("bob".to_string(), "alice".to_string()), SwipeAction::Like);

    let a = evaluate_user_swipe(SwipeAction::Like, Some(SwipeAction::Like));
    let b = evaluate_user_swipe(SwipeAction::Like, Some(SwipeAction::Like));
    assert_eq!(a, SwipeOutcome::CreateMatch);
    assert_eq!(b, SwipeOutcome::CreateMatch);

    ledger.matches.insert(pair_key("alice", "bob", SwipeTargetType::User));
    ledger.matches.insert(pair_key("bob", "alice", SwipeTargetType::User));
    assert_eq!(ledger.matches.len(), 1);
}

#[test]
fn test_pass_never_produces_a_match() {
    let mut ledger = TestLedger::default();

    ledger.swipe_user("alice", "bob", SwipeAction::Like);
    assert!(!ledger.swipe_user("bob", "alice", SwipeAction::Pass));
    assert!(ledger.matches.is_empty());

    // A later re-swipe to LIKE completes the pair
    assert!(ledger.swipe_user("bob", "alice", SwipeAction::Like));
    assert_eq!(ledger.matches.len(), 1);
}

#[test]
fn test_reswipe_overwrites_instead_of_duplicating() {
    let mut ledger = TestLedger::default();

    ledger.swipe_user("alice", "bob", SwipeAction::Like);
    ledger.swipe_user("alice", "bob", SwipeAction::Pass);

    assert_eq!(ledger.swipes.len(), 1);
    assert_eq!(
        ledger.swipes.get(&("alice".to_string(), "bob".to_string())),
        Some(&SwipeAction::Pass)
    );
}

#[test]
fn test_auto_accept_listing_matches_without_reciprocal() {
    assert_eq!(
        evaluate_listing_swipe(SwipeAction::Like, true, None),
        SwipeOutcome::CreateMatch
    );
    // Without auto-accept the same like stays one-sided
    assert_eq!(
        evaluate_listing_swipe(SwipeAction::Like, false, None),
        SwipeOutcome::NoMatch
    );
    // ...until the owner likes the candidate back
    assert_eq!(
        evaluate_listing_swipe(SwipeAction::Like, false, Some(SwipeAction::Like)),
        SwipeOutcome::CreateMatch
    );
}

fn apartment_group(place_id: Uuid, mean_score: i16, minutes_ago: i64) -> RatingGroup {
    RatingGroup {
        id: Uuid::new_v4(),
        author_id: format!("author-{minutes_ago}"),
        place_id,
        landlord_id: None,
        landlord_scores: None,
        apartment_scores: Some(ApartmentScores {
            condition: mean_score,
            noise: mean_score,
            utilities: mean_score,
            sunlight: mean_score,
        }),
        comment: Some("fine".to_string()),
        created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
            - Duration::minutes(minutes_ago),
    }
}

#[test]
fn test_integration_place_profile_aggregation() {
    let place_id = Uuid::new_v4();
    let groups = vec![
        apartment_group(place_id, 6, 30),
        apartment_group(place_id, 7, 20),
        apartment_group(place_id, 8, 10),
    ];

    let summary = summarize_place_ratings(&groups, 2);

    assert_eq!(summary.counts.apartment, 3);
    assert_eq!(summary.counts.landlord, 0);
    assert_eq!(summary.averages.apartment, Some(7.0));
    assert_eq!(summary.averages.landlord, None);

    // Recent window is capped and newest-first
    assert_eq!(summary.recent.len(), 2);
    assert_eq!(summary.recent[0].id, groups[2].id);
    assert_eq!(summary.recent[1].id, groups[1].id);
}

#[test]
fn test_integration_empty_profile_is_not_an_error() {
    let summary = summarize_place_ratings(&[], 10);
    assert_eq!(summary.counts.apartment, 0);
    assert_eq!(summary.averages.apartment, None);
    assert!(summary.recent.is_empty());
}

#[test]
fn test_integration_roommate_summary() {
    let rating = |value: i16, rater: &str| RoommateRating {
        id: Uuid::new_v4(),
        rater_id: rater.to_string(),
        ratee: RateeRef::User("dana".to_string()),
        scores: RoommateScores {
            cleanliness: value,
            reliability: value,
            communication: value,
            respect: value,
        },
        comment: None,
        created_at: Utc::now(),
    };

    let summary = summarize_roommate_ratings(&[rating(9, "a"), rating(5, "b")]);
    assert_eq!(summary.roommate_avg, Some(7.0));
    assert_eq!(summary.count, 2);
}
