use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser, error::ApiError, payments::repo::Payment, state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRequest {
    pub plan: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/payment", post(create_payment))
}

#[instrument(skip(state, payload))]
pub async fn create_payment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<NewPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let plan = payload
        .plan
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("Plan, amount and payment method are required".into())
        })?;
    let method = payload
        .payment_method
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("Plan, amount and payment method are required".into())
        })?;
    let amount = payload
        .amount
        .filter(|a| a.is_finite() && *a >= 0.0)
        .ok_or_else(|| {
            ApiError::Validation("Plan, amount and payment method are required".into())
        })?;

    // Informal association: external identity id when the account has
    // one, the user id otherwise.
    let member = user
        .external_id
        .clone()
        .unwrap_or_else(|| user.id.to_string());

    let payment = Payment::create(&state.db, &member, plan, amount, method).await?;

    info!(payment_id = %payment.id, %member, plan, amount, "payment recorded");
    Ok((StatusCode::CREATED, Json(payment)))
}
