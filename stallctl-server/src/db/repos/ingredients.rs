//! Ingredient repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use super::{DbError, Id};
use crate::models::{Amount, IngredientName};

/// Ingredient record from database
#[derive(Debug, Clone, FromRow)]
pub struct Ingredient {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub cost_per_gram: Decimal,
    pub created_at: DateTime<Utc>,
}

pub struct IngredientRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> IngredientRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Id,
        name: &IngredientName,
        cost_per_gram: Amount,
    ) -> Result<Ingredient, DbError> {
        let ingredient = sqlx::query_as(
            r#"
            INSERT INTO ingredients (user_id, name, cost_per_gram)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, cost_per_gram, created_at
            "#,
        )
        .bind(user_id)
        .bind(name.as_str())
        .bind(cost_per_gram.get())
        .fetch_one(self.pool)
        .await
        .map_err(DbError::conflict_on_unique("ingredient", name.as_str()))?;

        Ok(ingredient)
    }

    pub async fn list(&self, user_id: Id) -> Result<Vec<Ingredient>, DbError> {
        let ingredients = sqlx::query_as(
            r#"
            SELECT id, user_id, name, cost_per_gram, created_at
            FROM ingredients
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(ingredients)
    }

    pub async fn get(&self, user_id: Id, ingredient_id: Id) -> Result<Ingredient, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, user_id, name, cost_per_gram, created_at
            FROM ingredients
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(ingredient_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("ingredient", ingredient_id))
    }

    /// Rename and/or reprice; `None` keeps the current value.
    pub async fn update(
        &self,
        user_id: Id,
        ingredient_id: Id,
        name: Option<&IngredientName>,
        cost_per_gram: Option<Amount>,
    ) -> Result<Ingredient, DbError> {
        let conflict_name = name.map(|n| n.as_str()).unwrap_or_default();

        sqlx::query_as(
            r#"
            UPDATE ingredients SET
                name = COALESCE($3, name),
                cost_per_gram = COALESCE($4, cost_per_gram)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, cost_per_gram, created_at
            "#,
        )
        .bind(ingredient_id)
        .bind(user_id)
        .bind(name.map(IngredientName::as_str))
        .bind(cost_per_gram.map(|c| c.get()))
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::conflict_on_unique("ingredient", conflict_name))?
        .ok_or_else(|| DbError::not_found("ingredient", ingredient_id))
    }
}
