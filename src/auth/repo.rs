use crate::auth::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, external_id, is_admin, created_at, updated_at";

// Same column list with the hash blanked out, for lookups that must not
// carry credentials around (the auth gate, admin listings).
const USER_COLUMNS_PUBLIC: &str =
    "id, name, email, NULL::TEXT AS password_hash, external_id, is_admin, created_at, updated_at";

impl User {
    /// Find a user by email, hash included (login path).
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id with the password hash excluded.
    pub async fn find_by_id_public(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS_PUBLIC} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by external identity id or email (sync path).
    pub async fn find_by_external_or_email(
        db: &PgPool,
        external_id: &str,
        email: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1 OR email = $2"
        ))
        .bind(external_id)
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a locally registered user with a hashed password.
    pub async fn create_local(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, is_admin)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Create a user from an external identity, with no local password.
    pub async fn create_external(
        db: &PgPool,
        external_id: &str,
        name: &str,
        email: &str,
        is_admin: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, external_id, is_admin)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(external_id)
        .bind(is_admin)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Refresh name/email/external id from the identity provider.
    /// `promote` can only raise the admin flag, never lower it.
    pub async fn sync_update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        email: &str,
        external_id: &str,
        promote: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $2, email = $3, external_id = $4,
                 is_admin = is_admin OR $5, updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(external_id)
        .bind(promote)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Set the admin flag for the user with this email. Returns `None`
    /// when no such user exists.
    pub async fn promote_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_admin = TRUE, updated_at = now()
             WHERE email = $1
             RETURNING {USER_COLUMNS_PUBLIC}"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Delete a user. Returns whether a row was removed.
    pub async fn delete_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All users, password hashes excluded, newest first.
    pub async fn list_public(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS_PUBLIC} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}
