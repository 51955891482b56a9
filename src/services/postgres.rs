use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::core::MessageCursor;
use crate::error::CoreError;
use crate::models::{
    ApartmentScores, LandlordScores, Listing, Match, Message, Place, PlaceRef, RateeRef,
    RatingGroup, RoommateRating, RoommateScores, SwipeAction, SwipeTargetType,
};

/// PostgreSQL store for places, ratings, swipes, matches and messages.
///
/// This is the only shared mutable resource in the service. The three
/// race-sensitive writes (place get-or-insert, landlord get-or-insert,
/// match get-or-insert) are single `ON CONFLICT` statements so concurrent
/// callers never create duplicate identity rows; the rating-group write
/// is one transaction so a partial submission is never observable.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new client from a connection string and run migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, CoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(sqlx::Error::from)?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
    ) -> Result<Self, CoreError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, CoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // ---- Place Resolver -------------------------------------------------

    /// Resolve a place reference to its row, creating it if unseen.
    ///
    /// Atomic get-or-insert keyed on `place_key`; the address and
    /// coordinates are refreshed last-write-wins when the caller supplies
    /// them, so two requests with the same key always land on one row.
    pub async fn resolve_place(
        &self,
        place_key: &str,
        place_ref: &PlaceRef,
    ) -> Result<Uuid, CoreError> {
        resolve_place_on(&self.pool, place_key, place_ref).await
    }

    pub async fn get_place(&self, place_id: Uuid) -> Result<Place, CoreError> {
        let query = r#"
            SELECT id, external_id, formatted_address, latitude, longitude
            FROM places
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CoreError::PlaceNotFound)?;

        Ok(Place {
            id: row.get("id"),
            external_id: row.get("external_id"),
            formatted_address: row.get("formatted_address"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
        })
    }

    // ---- Rating Store ---------------------------------------------------

    /// Persist a validated rating group.
    ///
    /// Place resolution, landlord identity resolution and the group
    /// insert run in one transaction; on any failure the whole unit rolls
    /// back and nothing is observable.
    pub async fn insert_rating_group(
        &self,
        author_id: &str,
        place_key: &str,
        place_ref: &PlaceRef,
        landlord_hash: Option<&str>,
        landlord_scores: Option<&LandlordScores>,
        apartment_scores: Option<&ApartmentScores>,
        comment: Option<&str>,
    ) -> Result<Uuid, CoreError> {
        let mut tx = self.pool.begin().await?;

        let place_id = resolve_place_on(&mut *tx, place_key, place_ref).await?;

        let landlord_id = match landlord_hash {
            Some(hash) => Some(resolve_landlord_on(&mut *tx, hash).await?),
            None => None,
        };

        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO rating_groups
                (id, author_id, place_id, landlord_id, landlord_scores, apartment_scores, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(author_id)
            .bind(place_id)
            .bind(landlord_id)
            .bind(landlord_scores.map(Json))
            .bind(apartment_scores.map(Json))
            .bind(comment)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("stored rating group {} for place {}", id, place_id);

        Ok(id)
    }

    /// Fetch every rating group for a place in insertion order.
    pub async fn rating_groups_for_place(
        &self,
        place_id: Uuid,
    ) -> Result<Vec<RatingGroup>, CoreError> {
        let query = r#"
            SELECT id, author_id, place_id, landlord_id, landlord_scores, apartment_scores, comment, created_at
            FROM rating_groups
            WHERE place_id = $1
            ORDER BY seq ASC
        "#;

        let rows = sqlx::query(query)
            .bind(place_id)
            .fetch_all(&self.pool)
            .await?;

        let groups = rows
            .iter()
            .map(|row| RatingGroup {
                id: row.get("id"),
                author_id: row.get("author_id"),
                place_id: row.get("place_id"),
                landlord_id: row.get("landlord_id"),
                landlord_scores: row
                    .get::<Option<Json<LandlordScores>>, _>("landlord_scores")
                    .map(|json| json.0),
                apartment_scores: row
                    .get::<Option<Json<ApartmentScores>>, _>("apartment_scores")
                    .map(|json| json.0),
                comment: row.get("comment"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(groups)
    }

    pub async fn insert_roommate_rating(
        &self,
        rater_id: &str,
        ratee: &RateeRef,
        scores: &RoommateScores,
        comment: Option<&str>,
    ) -> Result<Uuid, CoreError> {
        let (ratee_kind, ratee_value) = match ratee {
            RateeRef::User(id) => ("user", id.as_str()),
            RateeRef::Hint(hint) => ("hint", hint.as_str()),
        };

        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO roommate_ratings
                (id, rater_id, ratee_kind, ratee_value, scores, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(rater_id)
            .bind(ratee_kind)
            .bind(ratee_value)
            .bind(Json(scores))
            .bind(comment)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Fetch the roommate ratings received by a user (account ratees only).
    pub async fn roommate_ratings_for(
        &self,
        user_id: &str,
    ) -> Result<Vec<RoommateRating>, CoreError> {
        let query = r#"
            SELECT id, rater_id, ratee_kind, ratee_value, scores, comment, created_at
            FROM roommate_ratings
            WHERE ratee_kind = 'user' AND ratee_value = $1
            ORDER BY seq ASC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let ratings = rows
            .iter()
            .map(|row| {
                let ratee_value: String = row.get("ratee_value");
                RoommateRating {
                    id: row.get("id"),
                    rater_id: row.get("rater_id"),
                    ratee: RateeRef::User(ratee_value),
                    scores: row.get::<Json<RoommateScores>, _>("scores").0,
                    comment: row.get("comment"),
                    created_at: row.get("created_at"),
                }
            })
            .collect();

        Ok(ratings)
    }

    // ---- Listings -------------------------------------------------------

    pub async fn insert_listing(
        &self,
        owner_id: &str,
        place_id: Uuid,
        title: &str,
        auto_accept: bool,
    ) -> Result<Uuid, CoreError> {
        let id = Uuid::new_v4();
        let query = r#"
            INSERT INTO listings (id, owner_id, place_id, title, auto_accept, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
        "#;

        sqlx::query(query)
            .bind(id)
            .bind(owner_id)
            .bind(place_id)
            .bind(title)
            .bind(auto_accept)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn get_listing(&self, listing_id: Uuid) -> Result<Listing, CoreError> {
        let query = r#"
            SELECT id, owner_id, place_id, title, auto_accept, created_at
            FROM listings
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CoreError::ListingNotFound)?;

        Ok(Listing {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            place_id: row.get("place_id"),
            title: row.get("title"),
            auto_accept: row.get("auto_accept"),
            created_at: row.get("created_at"),
        })
    }

    // ---- Swipe Ledger ---------------------------------------------------

    /// Upsert the unique (actor, target type, target id) swipe record.
    ///
    /// Re-swiping the same target overwrites the prior action and
    /// timestamp instead of duplicating the row.
    pub async fn record_swipe(
        &self,
        actor_id: &str,
        target_type: SwipeTargetType,
        target_id: &str,
        action: SwipeAction,
    ) -> Result<(), CoreError> {
        let query = r#"
            INSERT INTO swipes (actor_id, target_type, target_id, action, swiped_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (actor_id, target_type, target_id)
            DO UPDATE SET
                action = EXCLUDED.action,
                swiped_at = EXCLUDED.swiped_at
        "#;

        sqlx::query(query)
            .bind(actor_id)
            .bind(target_type.as_str())
            .bind(target_id)
            .bind(action.as_str())
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            "recorded swipe: {} -> {} {} ({})",
            actor_id,
            target_type.as_str(),
            target_id,
            action.as_str()
        );

        Ok(())
    }

    /// Look up one direction of the ledger.
    pub async fn get_swipe(
        &self,
        actor_id: &str,
        target_type: SwipeTargetType,
        target_id: &str,
    ) -> Result<Option<SwipeAction>, CoreError> {
        let query = r#"
            SELECT action
            FROM swipes
            WHERE actor_id = $1 AND target_type = $2 AND target_id = $3
        "#;

        let row = sqlx::query(query)
            .bind(actor_id)
            .bind(target_type.as_str())
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.and_then(|r| SwipeAction::parse(r.get("action"))))
    }

    /// Find a LIKE the candidate has recorded on any listing owned by
    /// `owner_id`. Lets an owner's like on the candidate complete a
    /// listing match started from the candidate's side.
    pub async fn find_listing_like(
        &self,
        candidate_id: &str,
        owner_id: &str,
    ) -> Result<Option<Uuid>, CoreError> {
        let query = r#"
            SELECT l.id
            FROM swipes s
            JOIN listings l ON l.id::text = s.target_id
            WHERE s.actor_id = $1
              AND s.target_type = 'LISTING'
              AND s.action = 'LIKE'
              AND l.owner_id = $2
            ORDER BY s.swiped_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(candidate_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("id")))
    }

    // ---- Match Engine ---------------------------------------------------

    /// Materialize the match for a pair, exactly once.
    ///
    /// `INSERT ... ON CONFLICT DO NOTHING` on the normalized pair key; a
    /// conflict means another swipe got there first and the existing row
    /// is returned as success. Two users liking each other in the same
    /// instant therefore produce one match.
    pub async fn create_match_if_absent(
        &self,
        pair_key: &str,
        user_a: &str,
        user_b: &str,
        target_type: SwipeTargetType,
        listing_id: Option<Uuid>,
    ) -> Result<Uuid, CoreError> {
        let insert = r#"
            INSERT INTO matches (id, pair_key, user_a, user_b, target_type, listing_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (pair_key) DO NOTHING
            RETURNING id
        "#;

        let inserted = sqlx::query(insert)
            .bind(Uuid::new_v4())
            .bind(pair_key)
            .bind(user_a)
            .bind(user_b)
            .bind(target_type.as_str())
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = inserted {
            let id: Uuid = row.get("id");
            tracing::info!("match created: {} ({})", id, pair_key);
            return Ok(id);
        }

        // Lost the race (or re-like of an existing pair): report the
        // existing match as success
        let existing = sqlx::query("SELECT id FROM matches WHERE pair_key = $1")
            .bind(pair_key)
            .fetch_one(&self.pool)
            .await?;

        Ok(existing.get("id"))
    }

    pub async fn get_match(&self, match_id: Uuid) -> Result<Match, CoreError> {
        let query = r#"
            SELECT id, pair_key, user_a, user_b, target_type, listing_id, created_at, last_message_at
            FROM matches
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CoreError::MatchNotFound)?;

        let target_type: String = row.get("target_type");

        Ok(Match {
            id: row.get("id"),
            user_a: row.get("user_a"),
            user_b: row.get("user_b"),
            target_type: SwipeTargetType::parse(&target_type)
                .unwrap_or(SwipeTargetType::User),
            listing_id: row.get("listing_id"),
            created_at: row.get("created_at"),
            last_message_at: row.get("last_message_at"),
        })
    }

    // ---- Messaging Gateway ----------------------------------------------

    /// Insert a message and bump the match's `last_message_at` in one
    /// transaction.
    pub async fn insert_message(
        &self,
        match_id: Uuid,
        sender_id: &str,
        body: &str,
    ) -> Result<Message, CoreError> {
        let mut tx = self.pool.begin().await?;

        let id = Uuid::new_v4();
        let insert = r#"
            INSERT INTO messages (id, match_id, sender_id, body, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING created_at
        "#;

        let row = sqlx::query(insert)
            .bind(id)
            .bind(match_id)
            .bind(sender_id)
            .bind(body)
            .fetch_one(&mut *tx)
            .await?;

        let created_at: DateTime<Utc> = row.get("created_at");

        sqlx::query("UPDATE matches SET last_message_at = $1 WHERE id = $2")
            .bind(created_at)
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Message {
            id,
            match_id,
            sender_id: sender_id.to_string(),
            body: body.to_string(),
            created_at,
        })
    }

    /// One page of messages, newest to oldest, keyset-paginated on
    /// `(created_at, id)`.
    pub async fn list_messages(
        &self,
        match_id: Uuid,
        cursor: Option<MessageCursor>,
        limit: u32,
    ) -> Result<Vec<Message>, CoreError> {
        let rows = match cursor {
            Some(cursor) => {
                let query = r#"
                    SELECT id, match_id, sender_id, body, created_at
                    FROM messages
                    WHERE match_id = $1 AND (created_at, id) < ($2, $3)
                    ORDER BY created_at DESC, id DESC
                    LIMIT $4
                "#;
                sqlx::query(query)
                    .bind(match_id)
                    .bind(cursor.created_at)
                    .bind(cursor.id)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = r#"
                    SELECT id, match_id, sender_id, body, created_at
                    FROM messages
                    WHERE match_id = $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                "#;
                sqlx::query(query)
                    .bind(match_id)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let messages = rows
            .iter()
            .map(|row| Message {
                id: row.get("id"),
                match_id: row.get("match_id"),
                sender_id: row.get("sender_id"),
                body: row.get("body"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(messages)
    }
}

/// Atomic get-or-insert of a place, usable on the pool or inside a
/// transaction. The `DO UPDATE` arm refreshes attributes last-write-wins
/// and makes `RETURNING id` yield a row on both paths.
async fn resolve_place_on<'e, E>(
    executor: E,
    place_key: &str,
    place_ref: &PlaceRef,
) -> Result<Uuid, CoreError>
where
    E: sqlx::PgExecutor<'e>,
{
    let query = r#"
        INSERT INTO places (id, place_key, external_id, formatted_address, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (place_key)
        DO UPDATE SET
            formatted_address = COALESCE(EXCLUDED.formatted_address, places.formatted_address),
            latitude = COALESCE(EXCLUDED.latitude, places.latitude),
            longitude = COALESCE(EXCLUDED.longitude, places.longitude)
        RETURNING id
    "#;

    let row = sqlx::query(query)
        .bind(Uuid::new_v4())
        .bind(place_key)
        .bind(place_ref.external_id.as_deref().map(str::trim))
        .bind(place_ref.formatted_address.as_deref())
        .bind(place_ref.lat)
        .bind(place_ref.lng)
        .fetch_one(executor)
        .await?;

    Ok(row.get("id"))
}

/// Atomic get-or-insert of a landlord identity by phone hash.
async fn resolve_landlord_on<'e, E>(executor: E, phone_hash: &str) -> Result<Uuid, CoreError>
where
    E: sqlx::PgExecutor<'e>,
{
    let query = r#"
        INSERT INTO landlords (id, phone_hash)
        VALUES ($1, $2)
        ON CONFLICT (phone_hash)
        DO UPDATE SET phone_hash = EXCLUDED.phone_hash
        RETURNING id
    "#;

    let row = sqlx::query(query)
        .bind(Uuid::new_v4())
        .bind(phone_hash)
        .fetch_one(executor)
        .await?;

    Ok(row.get("id"))
}
