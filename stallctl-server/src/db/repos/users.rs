//! User repository
//!
//! Credentials live with the authenticating proxy; this table only anchors
//! ownership of items, ingredients and sales.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::{DbError, Id};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, username: &str) -> Result<User, DbError> {
        let user = sqlx::query_as(
            r#"
            INSERT INTO users (username) VALUES ($1)
            RETURNING id, username, created_at
            "#,
        )
        .bind(username)
        .fetch_one(self.pool)
        .await
        .map_err(DbError::conflict_on_unique("user", username))?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as("SELECT id, username, created_at FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as("SELECT id, username, created_at FROM users ORDER BY username")
            .fetch_all(self.pool)
            .await?;
        Ok(users)
    }
}
