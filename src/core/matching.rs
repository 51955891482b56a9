use crate::models::{SwipeAction, SwipeTargetType};

/// State of one unordered pair for one target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    NoInterest,
    OneSidedLike,
    Matched,
}

/// What a freshly recorded swipe should do to the match table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Record the swipe, create nothing.
    NoMatch,
    /// Both directions of interest exist: materialize the match. The
    /// insert itself is conflict-as-success, so a concurrent twin swipe
    /// still yields exactly one row.
    CreateMatch,
}

/// Order a pair of user ids into the canonical (low, high) form.
pub fn ordered_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Normalized identity key for a match: target type plus the unordered
/// pair. Stable across process restarts and symmetric in its arguments;
/// the store's uniqueness constraint hangs on this value.
pub fn pair_key(a: &str, b: &str, target_type: SwipeTargetType) -> String {
    let (low, high) = ordered_pair(a, b);
    format!("{}:{}:{}", target_type.as_str(), low, high)
}

/// Decide the transition for a swipe between two users.
///
/// `reciprocal` is the swipe the other party has recorded toward the
/// actor, if any. Only LIKE in both directions matches; PASS never
/// advances a pair and never erases anything.
pub fn evaluate_user_swipe(
    action: SwipeAction,
    reciprocal: Option<SwipeAction>,
) -> SwipeOutcome {
    match (action, reciprocal) {
        (SwipeAction::Like, Some(SwipeAction::Like)) => SwipeOutcome::CreateMatch,
        _ => SwipeOutcome::NoMatch,
    }
}

/// Decide the transition for a swipe on a listing.
///
/// The pair is (swiping user, listing owner). An `auto_accept` listing
/// matches on the LIKE alone; otherwise the owner must have recorded a
/// LIKE back on the candidate.
pub fn evaluate_listing_swipe(
    action: SwipeAction,
    auto_accept: bool,
    owner_reciprocal: Option<SwipeAction>,
) -> SwipeOutcome {
    if action != SwipeAction::Like {
        return SwipeOutcome::NoMatch;
    }

    if auto_accept || owner_reciprocal == Some(SwipeAction::Like) {
        SwipeOutcome::CreateMatch
    } else {
        SwipeOutcome::NoMatch
    }
}

/// Derive the observable state of a pair from its two swipe directions
/// and whether a match row already exists. A persisted match is terminal
/// regardless of later swipes.
pub fn pair_state(
    forward: Option<SwipeAction>,
    backward: Option<SwipeAction>,
    matched: bool,
) -> MatchState {
    if matched {
        return MatchState::Matched;
    }

    match (forward, backward) {
        (Some(SwipeAction::Like), Some(SwipeAction::Like)) => MatchState::Matched,
        (Some(SwipeAction::Like), _) | (_, Some(SwipeAction::Like)) => MatchState::OneSidedLike,
        _ => MatchState::NoInterest,
    }
}
