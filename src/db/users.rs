use uuid::Uuid;

use super::{inserted_id, InsertOutcome, Store};
use crate::error::Result;
use crate::models::{User, UserRecord};
use crate::security::{hash_password, verify_password};

const USER_COLUMNS: &str = "id, correo, clave, nombre, sesion";

impl Store {
    /// Register a user; the password is stored as a salted argon2id hash
    ///
    /// Returns `AlreadyExists` when the email is taken.
    pub async fn insert_user(&self, email: &str, password: &str, name: &str) -> Result<InsertOutcome> {
        Ok(match self.create_user(email, password, name).await? {
            Some(_) => InsertOutcome::Inserted,
            None => InsertOutcome::AlreadyExists,
        })
    }

    /// Register a user and return the stored row, `None` when the email is taken
    ///
    /// Each user gets a fresh random session token, so a cookie issued before a
    /// reset never matches a user created after it.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Option<UserRecord>> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
        let session_token = Uuid::new_v4().to_string();

        let result = sqlx::query(
            "INSERT INTO usuario (correo, clave, nombre, sesion) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .bind(&session_token)
        .execute(self.pool())
        .await;

        let Some(id) = inserted_id(result)? else {
            tracing::warn!("Email already registered");
            return Ok(None);
        };

        tracing::info!("New user registered: {}", name);

        Ok(Some(UserRecord {
            id,
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            session_token,
        }))
    }

    pub async fn find_users_by_name(&self, name: &str) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM usuario WHERE nombre = ? ORDER BY id",
            USER_COLUMNS
        ))
        .bind(name)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM usuario WHERE correo = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        Ok(user.map(User::from))
    }

    /// User owning a session token
    pub async fn find_user_by_session(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM usuario WHERE sesion = ?",
            USER_COLUMNS
        ))
        .bind(token)
        .fetch_optional(self.pool())
        .await?;

        Ok(user.map(User::from))
    }

    /// Check a login against the stored hashes of every user with that name
    pub async fn authenticate(&self, name: &str, password: &str) -> Result<Option<UserRecord>> {
        let candidates = self.find_users_by_name(name).await?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let password = password.to_string();
        let matched = tokio::task::spawn_blocking(move || {
            candidates
                .into_iter()
                .find(|user| verify_password(&password, &user.password_hash))
        })
        .await?;

        Ok(matched)
    }
}
