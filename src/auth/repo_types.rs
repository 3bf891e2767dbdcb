use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 hash; absent for accounts created through external-identity
    /// sync. Never exposed in JSON.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub external_id: Option<String>,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Alex".into(),
            email: "alex@example.com".into(),
            password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$abc$def".into()),
            external_id: None,
            is_admin: false,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn password_hash_never_serializes() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn json_keys_are_camel_case() {
        let value = serde_json::to_value(sample_user()).unwrap();
        assert!(value.get("isAdmin").is_some());
        assert!(value.get("externalId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("is_admin").is_none());
    }
}
