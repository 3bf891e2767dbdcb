use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PromoteRequest, RegisterRequest, SyncRequest},
        extractors::AdminUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
    validate::is_valid_email,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/sync", post(sync))
        .route("/auth/promote", put(promote))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    // Hashing happens here, in the open, not in a store hook.
    let hash = hash_password(&payload.password)?;
    let is_admin = state.config.is_bootstrap_admin(&payload.email);
    let user = User::create_local(&state.db, payload.name.trim(), &payload.email, &hash, is_admin)
        .await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, is_admin, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required".into()));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthenticated("Invalid email or password".into())
        })?;

    // External-identity accounts carry no local password and cannot log
    // in with one.
    let hash = user.password_hash.as_deref().ok_or_else(|| {
        warn!(user_id = %user.id, "login against passwordless account");
        ApiError::Unauthenticated("Invalid email or password".into())
    })?;

    if !verify_password(&payload.password, hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthenticated("Invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Reconcile a locally stored user with an external identity provider's
/// profile. Idempotent for identical input; the bootstrap rule only ever
/// raises the admin flag.
#[instrument(skip(state, payload))]
pub async fn sync(
    State(state): State<AppState>,
    Json(payload): Json<SyncRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let external_id = payload
        .external_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("External id and email are required".into()))?;
    let email = payload
        .email
        .as_deref()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation("External id and email are required".into()))?;
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();

    let user = match User::find_by_external_or_email(&state.db, external_id, &email).await? {
        None => {
            // No stored record to fall back on, so the provider must
            // supply a name.
            if name.is_empty() {
                return Err(ApiError::Validation("Name is required".into()));
            }
            let is_admin = state.config.is_bootstrap_admin(&email);
            let user =
                User::create_external(&state.db, external_id, name, &email, is_admin).await?;
            info!(user_id = %user.id, %email, is_admin, "user created from external identity");
            user
        }
        Some(existing) => {
            // Empty provider name keeps the stored one.
            let name = if name.is_empty() {
                existing.name.clone()
            } else {
                name.to_string()
            };
            let promote = !existing.is_admin && state.config.is_bootstrap_admin(&email);
            let user =
                User::sync_update(&state.db, existing.id, &name, &email, external_id, promote)
                    .await?;
            info!(user_id = %user.id, %email, promoted = promote, "user synced");
            user
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn promote(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<PromoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::Validation("Email is required".into()));
    }

    let user = User::promote_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(admin_id = %admin.id, user_id = %user.id, %email, "user promoted to admin");
    Ok(Json(json!({ "message": "User promoted to admin" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::extractors::AuthUser;
    use axum::extract::FromRequestParts;
    use sqlx::PgPool;

    fn sync_payload(external_id: &str, name: Option<&str>, email: &str) -> SyncRequest {
        SyncRequest {
            external_id: Some(external_id.into()),
            name: name.map(Into::into),
            email: Some(email.into()),
        }
    }

    #[sqlx::test]
    async fn registered_user_logs_in_with_right_password_only(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Alex".into(),
                email: "alex@example.com".into(),
                password: "Secur3P@ssw0rd!".into(),
            }),
        )
        .await
        .expect("register");

        let ok = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alex@example.com".into(),
                password: "Secur3P@ssw0rd!".into(),
            }),
        )
        .await
        .expect("login");
        assert_eq!(ok.0.user.email, "alex@example.com");

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "alex@example.com".into(),
                password: "wrong-password".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(m) if m == "Invalid email or password"));
    }

    #[sqlx::test]
    async fn login_rejects_external_only_account(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        User::create_external(&state.db, "ext_1", "A", "a@b.com", false)
            .await
            .expect("create");

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "a@b.com".into(),
                password: "whatever-pass".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(m) if m == "Invalid email or password"));
    }

    #[sqlx::test]
    async fn sync_is_idempotent(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        let first = sync(
            State(state.clone()),
            Json(sync_payload("ext_1", Some("A"), "a@b.com")),
        )
        .await
        .expect("first sync");
        let second = sync(
            State(state.clone()),
            Json(sync_payload("ext_1", Some("A"), "a@b.com")),
        )
        .await
        .expect("second sync");

        assert_eq!(first.0.user.id, second.0.user.id);
        assert!(!second.0.user.is_admin);
        assert_eq!(User::count(&state.db).await.expect("count"), 1);
    }

    #[sqlx::test]
    async fn sync_requires_name_for_new_accounts(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        let err = sync(
            State(state.clone()),
            Json(sync_payload("ext_1", None, "a@b.com")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(m) if m == "Name is required"));
        assert_eq!(User::count(&state.db).await.expect("count"), 0);
    }

    #[sqlx::test]
    async fn sync_bootstrap_address_gets_admin(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        let resp = sync(
            State(state),
            Json(sync_payload("ext_2", Some("Owner"), "owner@fitlife.test")),
        )
        .await
        .expect("sync");
        assert!(resp.0.user.is_admin);
    }

    #[sqlx::test]
    async fn deleted_user_token_fails_authentication(pool: PgPool) {
        let state = AppState::fake_with_pool(pool);
        let user = User::create_external(&state.db, "ext_9", "Gone", "gone@example.com", false)
            .await
            .expect("create");
        let token = JwtKeys::from_ref(&state).sign(user.id).expect("sign");
        assert!(User::delete_by_id(&state.db, user.id).await.expect("delete"));

        let req = axum::http::Request::builder()
            .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .expect("request");
        let (mut parts, _) = req.into_parts();
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(m) if m == "User not found"));
    }
}
