use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-boundary error taxonomy. Every handler returns
/// `Result<_, ApiError>`; conversion to an HTTP response happens here and
/// nowhere else.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required field.
    #[error("{0}")]
    Validation(String),
    /// Missing, malformed, or expired credential, or no matching user.
    #[error("{0}")]
    Unauthenticated(String),
    /// Valid credential without admin privilege. Rendered as 401, not
    /// 403 (the API's established convention).
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate unique field.
    #[error("{0}")]
    Conflict(String),
    /// Store or mail dependency failure. Detail is logged server-side;
    /// the caller only sees a generic message.
    #[error("Server error")]
    Upstream(anyhow::Error),
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return ApiError::Conflict("Duplicate record".into());
        }
        ApiError::Upstream(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(db) = err.downcast_ref::<sqlx::Error>() {
            if is_unique_violation(db) {
                return ApiError::Conflict("Duplicate record".into());
            }
        }
        ApiError::Upstream(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Validation failures report under "error", everything else
            // under "message".
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            ApiError::Forbidden(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::Upstream(err) => {
                error!(error = %err, "upstream failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_error_key() {
        let (status, body) = render(ApiError::Validation("All fields are required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "All fields are required");
    }

    #[tokio::test]
    async fn unauthenticated_and_forbidden_map_to_401() {
        let (status, body) =
            render(ApiError::Unauthenticated("Not authorized, no token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized, no token");

        let (status, body) =
            render(ApiError::Forbidden("Not authorized as an admin".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized as an admin");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = render(ApiError::NotFound("User not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn conflict_maps_to_400() {
        let (status, body) = render(ApiError::Conflict("User already exists".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User already exists");
    }

    #[tokio::test]
    async fn upstream_hides_detail_behind_generic_message() {
        let (status, body) =
            render(ApiError::Upstream(anyhow::anyhow!("pool timed out"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Server error");
    }

    #[tokio::test]
    async fn non_database_sqlx_error_stays_upstream() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
