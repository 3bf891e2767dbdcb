use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for external-identity sync.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub external_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Request body for admin promotion.
#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    pub email: String,
}

/// Response returned after register, login or sync.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub external_id: Option<String>,
    pub is_admin: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            external_id: user.external_id,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_camel_case() {
        let value = serde_json::to_value(PublicUser {
            id: Uuid::new_v4(),
            name: "Alex".into(),
            email: "alex@example.com".into(),
            external_id: Some("ext_1".into()),
            is_admin: true,
        })
        .unwrap();
        assert_eq!(value["externalId"], "ext_1");
        assert_eq!(value["isAdmin"], true);
    }

    #[test]
    fn sync_request_accepts_camel_case_external_id() {
        let req: SyncRequest =
            serde_json::from_str(r#"{"externalId":"ext_1","name":"A","email":"a@b.com"}"#)
                .unwrap();
        assert_eq!(req.external_id.as_deref(), Some("ext_1"));
    }
}
