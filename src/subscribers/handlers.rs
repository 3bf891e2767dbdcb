use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError, state::AppState, subscribers::repo::Subscriber, validate::is_valid_email,
};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

pub fn subscribe_routes() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }

    match Subscriber::find_by_email(&state.db, &email).await? {
        Some(existing) if existing.is_active => {
            warn!(%email, "duplicate subscription");
            return Err(ApiError::Conflict(
                "You're already subscribed to our newsletter!".into(),
            ));
        }
        Some(existing) => {
            Subscriber::reactivate(&state.db, existing.id).await?;
            info!(%email, "subscription reactivated");
        }
        None => {
            Subscriber::create(&state.db, &email).await?;
            info!(%email, "new subscriber stored");
        }
    }

    // Mail failure after the store write still fails the request; the
    // subscriber row survives and a retry lands on the reactivate path.
    state.mailer.send_welcome(&email).await.map_err(|e| {
        error!(error = %e, %email, "welcome email failed");
        ApiError::Upstream(e)
    })?;

    Ok(Json(json!({
        "message": "Subscription successful! Please check your email."
    })))
}
