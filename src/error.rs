use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur across the rating, matching and messaging flows
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("place reference carries neither an external id nor coordinates")]
    InvalidReference,

    #[error("score for '{facet}' is outside the 1..=10 range")]
    InvalidScore { facet: &'static str },

    #[error("a rating must carry at least one score set")]
    EmptyRating,

    #[error("users cannot rate themselves")]
    SelfRating,

    #[error("unknown swipe target type: {0}")]
    InvalidTarget(String),

    #[error("match not found")]
    MatchNotFound,

    #[error("listing not found")]
    ListingNotFound,

    #[error("place not found")]
    PlaceNotFound,

    #[error("user is not a participant of this match")]
    NotAMember,

    #[error("message body is empty")]
    EmptyBody,

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),
}

impl CoreError {
    /// Stable machine-readable code carried in the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidReference => "invalid_reference",
            CoreError::InvalidScore { .. } => "invalid_score",
            CoreError::EmptyRating => "empty_rating",
            CoreError::SelfRating => "self_rating",
            CoreError::InvalidTarget(_) => "invalid_target",
            CoreError::MatchNotFound => "match_not_found",
            CoreError::ListingNotFound => "listing_not_found",
            CoreError::PlaceNotFound => "place_not_found",
            CoreError::NotAMember => "not_a_member",
            CoreError::EmptyBody => "empty_body",
            CoreError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl ResponseError for CoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InvalidReference
            | CoreError::InvalidScore { .. }
            | CoreError::EmptyRating
            | CoreError::SelfRating
            | CoreError::InvalidTarget(_)
            | CoreError::EmptyBody => StatusCode::BAD_REQUEST,
            CoreError::NotAMember => StatusCode::FORBIDDEN,
            CoreError::MatchNotFound
            | CoreError::ListingNotFound
            | CoreError::PlaceNotFound => StatusCode::NOT_FOUND,
            CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // The sqlx error text may carry table or constraint names; log it
        // server-side and send only the generic envelope to the client
        let message = match self {
            CoreError::StoreUnavailable(inner) => {
                tracing::error!("store error: {}", inner);
                "The data store is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message,
            status_code: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        assert_eq!(CoreError::InvalidReference.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CoreError::InvalidScore { facet: "noise" }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CoreError::EmptyRating.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(CoreError::SelfRating.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CoreError::InvalidTarget("GROUP".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(CoreError::EmptyBody.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_membership_is_forbidden() {
        assert_eq!(CoreError::NotAMember.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_missing_resources_are_not_found() {
        assert_eq!(CoreError::MatchNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CoreError::ListingNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(CoreError::PlaceNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failures_are_service_unavailable() {
        let err = CoreError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "store_unavailable");
    }

    #[test]
    fn test_error_messages_name_the_facet() {
        let err = CoreError::InvalidScore { facet: "sunlight" };
        assert!(err.to_string().contains("sunlight"));
    }
}
