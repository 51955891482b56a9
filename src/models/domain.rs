use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound reference to a physical place.
///
/// Either `external_id` (opaque provider identifier) or a complete
/// `(lat, lng)` pair must be present; the resolver rejects anything else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceRef {
    #[serde(rename = "externalId", alias = "external_id", default)]
    pub external_id: Option<String>,
    #[serde(rename = "formattedAddress", alias = "formatted_address", default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// A deduplicated physical place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    #[serde(rename = "externalId")]
    pub external_id: Option<String>,
    #[serde(rename = "formattedAddress")]
    pub formatted_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Landlord facet scores, each an integer in [1,10].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LandlordScores {
    pub fairness: i16,
    pub responsiveness: i16,
    pub maintenance: i16,
    pub privacy: i16,
}

/// Apartment facet scores, each an integer in [1,10].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApartmentScores {
    pub condition: i16,
    pub noise: i16,
    pub utilities: i16,
    pub sunlight: i16,
}

/// Roommate facet scores, each an integer in [1,10].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoommateScores {
    pub cleanliness: i16,
    pub reliability: i16,
    pub communication: i16,
    pub respect: i16,
}

impl LandlordScores {
    pub fn facets(&self) -> [(&'static str, i16); 4] {
        [
            ("fairness", self.fairness),
            ("responsiveness", self.responsiveness),
            ("maintenance", self.maintenance),
            ("privacy", self.privacy),
        ]
    }

    /// Mean of this submission's landlord facets.
    pub fn mean(&self) -> f64 {
        let facets = self.facets();
        facets.iter().map(|(_, v)| f64::from(*v)).sum::<f64>() / facets.len() as f64
    }
}

impl ApartmentScores {
    pub fn facets(&self) -> [(&'static str, i16); 4] {
        [
            ("condition", self.condition),
            ("noise", self.noise),
            ("utilities", self.utilities),
            ("sunlight", self.sunlight),
        ]
    }

    pub fn mean(&self) -> f64 {
        let facets = self.facets();
        facets.iter().map(|(_, v)| f64::from(*v)).sum::<f64>() / facets.len() as f64
    }
}

impl RoommateScores {
    pub fn facets(&self) -> [(&'static str, i16); 4] {
        [
            ("cleanliness", self.cleanliness),
            ("reliability", self.reliability),
            ("communication", self.communication),
            ("respect", self.respect),
        ]
    }

    pub fn mean(&self) -> f64 {
        let facets = self.facets();
        facets.iter().map(|(_, v)| f64::from(*v)).sum::<f64>() / facets.len() as f64
    }
}

/// One immutable rating submission against a place.
///
/// Carries a landlord score set, an apartment score set, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingGroup {
    pub id: Uuid,
    #[serde(rename = "authorId")]
    pub author_id: String,
    #[serde(rename = "placeId")]
    pub place_id: Uuid,
    #[serde(rename = "landlordId")]
    pub landlord_id: Option<Uuid>,
    #[serde(rename = "landlordScores")]
    pub landlord_scores: Option<LandlordScores>,
    #[serde(rename = "apartmentScores")]
    pub apartment_scores: Option<ApartmentScores>,
    pub comment: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Target of a roommate rating: an account, or a free-text hint for
/// people without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RateeRef {
    User(String),
    Hint(String),
}

/// One immutable rating of a (possibly account-less) roommate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoommateRating {
    pub id: Uuid,
    #[serde(rename = "raterId")]
    pub rater_id: String,
    pub ratee: RateeRef,
    pub scores: RoommateScores,
    pub comment: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// An apartment listing, the target of LISTING swipes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    #[serde(rename = "placeId")]
    pub place_id: Uuid,
    pub title: String,
    #[serde(rename = "autoAccept")]
    pub auto_accept: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// What a swipe is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeTargetType {
    User,
    Listing,
}

impl SwipeTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeTargetType::User => "USER",
            SwipeTargetType::Listing => "LISTING",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USER" => Some(SwipeTargetType::User),
            "LISTING" => Some(SwipeTargetType::Listing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeAction {
    Like,
    Pass,
}

impl SwipeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeAction::Like => "LIKE",
            SwipeAction::Pass => "PASS",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LIKE" => Some(SwipeAction::Like),
            "PASS" => Some(SwipeAction::Pass),
            _ => None,
        }
    }
}

/// A mutually-confirmed (or auto-accepted) pairing.
///
/// `user_a` < `user_b` lexicographically; `pair_key` is the normalized
/// identity the uniqueness constraint hangs on and lives only in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    #[serde(rename = "targetType")]
    pub target_type: SwipeTargetType,
    #[serde(rename = "listingId")]
    pub listing_id: Option<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lastMessageAt")]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }
}

/// A message inside a match conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    #[serde(rename = "matchId")]
    pub match_id: Uuid,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
