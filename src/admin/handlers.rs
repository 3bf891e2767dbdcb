use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    admin::dto::StatsResponse,
    auth::{extractors::AdminUser, repo_types::User},
    error::ApiError,
    messages::repo::Message,
    payments::repo::Payment,
    state::AppState,
    subscribers::repo::Subscriber,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users).delete(delete_user))
        .route("/admin/stats", get(stats))
        .route("/admin/payments", get(list_payments))
        .route("/admin/subscribers", get(list_subscribers))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list_public(&state.db).await?;
    Ok(Json(users))
}

// The id arrives as text so a malformed value surfaces through the
// error taxonomy rather than the Query extractor's plain-text reject.
#[derive(Debug, Deserialize)]
pub struct DeleteUserParams {
    pub id: Option<String>,
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(params): Query<DeleteUserParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("User ID is required".into()))?;
    let id =
        Uuid::parse_str(id).map_err(|_| ApiError::Validation("Invalid user ID".into()))?;

    if !User::delete_by_id(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(admin_id = %admin.id, user_id = %id, "user removed");
    Ok(Json(json!({ "message": "User removed" })))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<StatsResponse>, ApiError> {
    let total_users = User::count(&state.db).await?;
    let total_subscribers = Subscriber::count(&state.db).await?;
    let total_messages = Message::count(&state.db).await?;
    let total_revenue = Payment::total_revenue(&state.db).await?;
    let recent_payments = Payment::count(&state.db).await?;

    Ok(Json(StatsResponse {
        total_users,
        total_subscribers,
        total_messages,
        total_revenue,
        recent_payments,
    }))
}

#[instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let payments = Payment::list_desc(&state.db).await?;
    Ok(Json(payments))
}

#[instrument(skip(state))]
pub async fn list_subscribers(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Subscriber>>, ApiError> {
    let subscribers = Subscriber::list_all(&state.db).await?;
    Ok(Json(subscribers))
}
