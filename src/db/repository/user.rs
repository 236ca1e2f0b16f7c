//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::Role;
use crate::db::models::{User, UserCreate};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid user ID format: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user (registration)
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate("Email already exists".to_string()));
        }

        // Hash password
        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let role = data.role.unwrap_or(Role::User);
        let now = now_millis();

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    first_name = $first_name,
                    last_name = $last_name,
                    phone = $phone,
                    status = 'active',
                    address = $address,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("email", data.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", role))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("phone", data.phone))
            .bind(("address", data.address))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Store a password reset token digest with its expiry
    pub async fn set_reset_token(
        &self,
        user_id: &RecordId,
        token_digest: &str,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    reset_password_token = $token,
                    reset_password_expires = $expires,
                    updated_at = $now"#,
            )
            .bind(("thing", user_id.clone()))
            .bind(("token", token_digest.to_string()))
            .bind(("expires", expires_at))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Find the user holding an unexpired reset token digest
    pub async fn find_by_valid_reset_token(&self, token_digest: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM user
                    WHERE reset_password_token = $token
                    AND reset_password_expires != NONE
                    AND reset_password_expires > $now
                    LIMIT 1"#,
            )
            .bind(("token", token_digest.to_string()))
            .bind(("now", now_millis()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Replace the password hash and clear any reset token
    pub async fn update_password(&self, user_id: &RecordId, hash_pass: &str) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    hash_pass = $hash_pass,
                    reset_password_token = NONE,
                    reset_password_expires = NONE,
                    updated_at = $now"#,
            )
            .bind(("thing", user_id.clone()))
            .bind(("hash_pass", hash_pass.to_string()))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Count all users (dashboard)
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
