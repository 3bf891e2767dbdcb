use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AdminUser,
    error::ApiError,
    messages::dto::{MessageCreated, NewMessageRequest},
    messages::repo::Message,
    state::AppState,
};

pub fn message_routes() -> Router<AppState> {
    Router::new().route("/messages", get(list_messages).post(create_message))
}

#[instrument(skip(state, payload))]
pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<NewMessageRequest>,
) -> Result<(StatusCode, Json<MessageCreated>), ApiError> {
    payload.validate()?;

    let message = Message::create(
        &state.db,
        payload.first_name.trim(),
        payload.last_name.trim(),
        &payload.email.trim().to_lowercase(),
        payload.message.trim(),
    )
    .await?;

    info!(message_id = %message.id, "contact message stored");
    Ok((
        StatusCode::CREATED,
        Json(MessageCreated {
            message: "Message sent successfully!".into(),
            data: message,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = Message::list_desc(&state.db).await?;
    Ok(Json(messages))
}
