use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::MessageCursor;
use crate::error::CoreError;
use crate::models::{
    ErrorResponse, ListMessagesQuery, MessagesPage, SendMessageRequest,
};
use crate::routes::AppState;

/// Configure messaging routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/{match_id}/messages", web::get().to(list_messages))
        .route("/matches/{match_id}/messages", web::post().to(send_message));
}

/// List messages in a match, newest first, cursor-paginated
///
/// GET /api/v1/matches/{match_id}/messages?userId=...&cursor=...&limit=...
async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListMessagesQuery>,
) -> Result<HttpResponse, CoreError> {
    let match_id = path.into_inner();

    let m = state.postgres.get_match(match_id).await?;
    if !m.has_participant(&query.user_id) {
        return Err(CoreError::NotAMember);
    }

    // A malformed cursor reads as the first page
    let cursor = query.cursor.as_deref().and_then(MessageCursor::decode);
    let limit = query
        .limit
        .unwrap_or(state.policy.message_page_size)
        .clamp(1, 100);

    let items = state.postgres.list_messages(match_id, cursor, limit).await?;

    let next_cursor = if items.len() == limit as usize {
        items.last().map(|last| {
            MessageCursor {
                created_at: last.created_at,
                id: last.id,
            }
            .encode()
        })
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(MessagesPage { items, next_cursor }))
}

/// Send a message inside a match
///
/// POST /api/v1/matches/{match_id}/messages
async fn send_message(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, CoreError> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        }));
    }

    if req.body.trim().is_empty() {
        return Err(CoreError::EmptyBody);
    }

    let match_id = path.into_inner();

    let m = state.postgres.get_match(match_id).await?;
    if !m.has_participant(&req.sender_id) {
        return Err(CoreError::NotAMember);
    }

    let message = state
        .postgres
        .insert_message(match_id, &req.sender_id, &req.body)
        .await?;

    Ok(HttpResponse::Ok().json(message))
}
