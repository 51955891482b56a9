use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{RatingGroup, RoommateRating};

/// Default size of the `recent` window in a place profile.
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// Number of rating groups carrying each score set, counted
/// independently; one group can count toward both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingCounts {
    pub landlord: usize,
    pub apartment: usize,
}

/// Headline and per-facet averages for a place.
///
/// Headline values are means over groups of each group's per-facet mean;
/// `extras` holds the independent per-facet means keyed by facet name.
/// All averages are `None`/empty when no data exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAverages {
    pub landlord: Option<f64>,
    pub apartment: Option<f64>,
    pub extras: BTreeMap<String, f64>,
}

/// Aggregated ratings view of one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceRatingsSummary {
    pub counts: RatingCounts,
    pub averages: RatingAverages,
    pub recent: Vec<RatingGroup>,
}

/// Aggregated roommate-rating view of one user as ratee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoommateSummary {
    #[serde(rename = "roommateAvg")]
    pub roommate_avg: Option<f64>,
    pub count: usize,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Summarize every rating group touching one place.
///
/// `groups` is expected in insertion order; `recent` returns the newest
/// `recent_window` groups, newest first, with insertion order breaking
/// timestamp ties (the later insert ranks first). Read-only: an empty
/// input produces zero counts and null averages, never an error.
pub fn summarize_place_ratings(
    groups: &[RatingGroup],
    recent_window: usize,
) -> PlaceRatingsSummary {
    let mut landlord_means = Vec::new();
    let mut apartment_means = Vec::new();
    let mut facet_values: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();

    for group in groups {
        if let Some(scores) = &group.landlord_scores {
            landlord_means.push(scores.mean());
            for (facet, value) in scores.facets() {
                facet_values.entry(facet).or_default().push(f64::from(value));
            }
        }
        if let Some(scores) = &group.apartment_scores {
            apartment_means.push(scores.mean());
            for (facet, value) in scores.facets() {
                facet_values.entry(facet).or_default().push(f64::from(value));
            }
        }
    }

    let extras = facet_values
        .into_iter()
        .filter_map(|(facet, values)| mean(&values).map(|avg| (facet.to_string(), avg)))
        .collect();

    // Newest first; stable secondary key = insertion order, later first
    let mut ordered: Vec<(usize, &RatingGroup)> = groups.iter().enumerate().collect();
    ordered.sort_by_key(|(index, group)| (Reverse(group.created_at), Reverse(*index)));

    let recent = ordered
        .into_iter()
        .take(recent_window)
        .map(|(_, group)| group.clone())
        .collect();

    PlaceRatingsSummary {
        counts: RatingCounts {
            landlord: landlord_means.len(),
            apartment: apartment_means.len(),
        },
        averages: RatingAverages {
            landlord: mean(&landlord_means),
            apartment: mean(&apartment_means),
            extras,
        },
        recent,
    }
}

/// Summarize the roommate ratings received by one user.
///
/// Same mean-of-per-submission-means policy as place averages;
/// `roommate_avg` is `None` when the user has no ratings.
pub fn summarize_roommate_ratings(ratings: &[RoommateRating]) -> RoommateSummary {
    let means: Vec<f64> = ratings.iter().map(|r| r.scores.mean()).collect();

    RoommateSummary {
        roommate_avg: mean(&means),
        count: means.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApartmentScores, LandlordScores, RateeRef, RoommateScores};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn group(
        apartment: Option<ApartmentScores>,
        landlord: Option<LandlordScores>,
        minutes_ago: i64,
    ) -> RatingGroup {
        RatingGroup {
            id: Uuid::new_v4(),
            author_id: "author".to_string(),
            place_id: Uuid::new_v4(),
            landlord_id: None,
            landlord_scores: landlord,
            apartment_scores: apartment,
            comment: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
                - Duration::minutes(minutes_ago),
        }
    }

    fn flat_apartment(value: i16) -> ApartmentScores {
        ApartmentScores {
            condition: value,
            noise: value,
            utilities: value,
            sunlight: value,
        }
    }

    fn flat_landlord(value: i16) -> LandlordScores {
        LandlordScores {
            fairness: value,
            responsiveness: value,
            maintenance: value,
            privacy: value,
        }
    }

    #[test]
    fn test_mean_of_group_means() {
        // Per-group apartment means 6, 7, 8 -> headline 7.0
        let groups = vec![
            group(Some(flat_apartment(6)), None, 30),
            group(Some(flat_apartment(7)), None, 20),
            group(Some(flat_apartment(8)), None, 10),
        ];

        let summary = summarize_place_ratings(&groups, DEFAULT_RECENT_WINDOW);
        assert_eq!(summary.counts.apartment, 3);
        assert_eq!(summary.counts.landlord, 0);
        assert_eq!(summary.averages.apartment, Some(7.0));
        assert_eq!(summary.averages.landlord, None);
    }

    #[test]
    fn test_group_counts_toward_both_sides() {
        let groups = vec![group(Some(flat_apartment(8)), Some(flat_landlord(4)), 0)];

        let summary = summarize_place_ratings(&groups, DEFAULT_RECENT_WINDOW);
        assert_eq!(summary.counts.apartment, 1);
        assert_eq!(summary.counts.landlord, 1);
        assert_eq!(summary.averages.apartment, Some(8.0));
        assert_eq!(summary.averages.landlord, Some(4.0));
    }

    #[test]
    fn test_per_facet_extras_are_independent() {
        let mut uneven = flat_apartment(4);
        uneven.noise = 10;

        let groups = vec![
            group(Some(uneven), None, 10),
            group(Some(flat_apartment(6)), None, 0),
        ];

        let summary = summarize_place_ratings(&groups, DEFAULT_RECENT_WINDOW);
        assert_eq!(summary.averages.extras.get("noise"), Some(&8.0));
        assert_eq!(summary.averages.extras.get("condition"), Some(&5.0));
        // No landlord groups: no landlord facets in extras
        assert!(summary.averages.extras.get("fairness").is_none());
    }

    #[test]
    fn test_empty_place_is_a_valid_result() {
        let summary = summarize_place_ratings(&[], DEFAULT_RECENT_WINDOW);
        assert_eq!(summary.counts.landlord, 0);
        assert_eq!(summary.counts.apartment, 0);
        assert_eq!(summary.averages.landlord, None);
        assert_eq!(summary.averages.apartment, None);
        assert!(summary.averages.extras.is_empty());
        assert!(summary.recent.is_empty());
    }

    #[test]
    fn test_recent_window_newest_first() {
        let groups: Vec<RatingGroup> = (0..5)
            .map(|i| group(Some(flat_apartment(5)), None, 50 - i * 10))
            .collect();

        let summary = summarize_place_ratings(&groups, 3);
        assert_eq!(summary.recent.len(), 3);
        assert!(summary.recent[0].created_at >= summary.recent[1].created_at);
        assert!(summary.recent[1].created_at >= summary.recent[2].created_at);
        assert_eq!(summary.recent[0].id, groups[4].id);
    }

    #[test]
    fn test_recent_ties_broken_by_insertion_order() {
        // Identical timestamps: the later insert ranks first
        let a = group(Some(flat_apartment(5)), None, 10);
        let mut b = group(Some(flat_apartment(6)), None, 10);
        b.created_at = a.created_at;

        let summary = summarize_place_ratings(&[a.clone(), b.clone()], 2);
        assert_eq!(summary.recent[0].id, b.id);
        assert_eq!(summary.recent[1].id, a.id);
    }

    #[test]
    fn test_roommate_summary_mean_of_means() {
        let rating = |value: i16| RoommateRating {
            id: Uuid::new_v4(),
            rater_id: "rater".to_string(),
            ratee: RateeRef::User("ratee".to_string()),
            scores: RoommateScores {
                cleanliness: value,
                reliability: value,
                communication: value,
                respect: value,
            },
            comment: None,
            created_at: Utc::now(),
        };

        let summary = summarize_roommate_ratings(&[rating(6), rating(8)]);
        assert_eq!(summary.roommate_avg, Some(7.0));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_roommate_summary_empty() {
        let summary = summarize_roommate_ratings(&[]);
        assert_eq!(summary.roommate_avg, None);
        assert_eq!(summary.count, 0);
    }
}
