//! Recipe repository
//!
//! A recipe component says how many grams of one ingredient go into one unit
//! of an item. `CostBook` joins items with their components so reports can
//! price any quantity without going back to the database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use stallctl_core::{CoreError, CostModel, LineFigures, RecipeLine};

use super::{DbError, Id, IngredientRepo, Item, ItemRepo};
use crate::models::Amount;

/// Recipe component joined with its ingredient
#[derive(Debug, Clone, FromRow)]
pub struct RecipeComponent {
    pub id: Id,
    pub item_id: Id,
    pub ingredient_id: Id,
    pub ingredient_name: String,
    pub grams_per_unit: Decimal,
    pub cost_per_gram: Decimal,
}

impl RecipeComponent {
    pub fn cost_per_unit(&self) -> Decimal {
        self.grams_per_unit * self.cost_per_gram
    }

    fn to_line(&self) -> RecipeLine {
        RecipeLine {
            ingredient: self.ingredient_name.clone(),
            grams_per_unit: self.grams_per_unit,
            cost_per_gram: self.cost_per_gram,
        }
    }
}

/// An item together with its priced recipe
#[derive(Debug, Clone)]
pub struct CostEntry {
    pub item: Item,
    pub components: Vec<RecipeComponent>,
    pub model: CostModel,
}

/// Cost models for every item of one user, in item name order
#[derive(Debug, Clone, Default)]
pub struct CostBook {
    entries: Vec<CostEntry>,
    index: HashMap<Id, usize>,
}

impl CostBook {
    /// Assemble from item rows and component rows; components of unknown
    /// items are ignored.
    pub fn build(items: Vec<Item>, components: Vec<RecipeComponent>) -> Result<Self, CoreError> {
        let mut by_item: HashMap<Id, Vec<RecipeComponent>> = HashMap::new();
        for component in components {
            by_item.entry(component.item_id).or_default().push(component);
        }

        let mut book = CostBook::default();
        for item in items {
            let components = by_item.remove(&item.id).unwrap_or_default();
            let model = components
                .iter()
                .fold(CostModel::new(item.pricing()?), |model, c| {
                    model.with_line(c.to_line())
                });
            book.index.insert(item.id, book.entries.len());
            book.entries.push(CostEntry {
                item,
                components,
                model,
            });
        }
        Ok(book)
    }

    pub fn get(&self, item_id: Id) -> Option<&CostEntry> {
        self.index.get(&item_id).map(|&i| &self.entries[i])
    }

    /// Figures for `qty` units of an item; zero figures for unknown items.
    pub fn figures(&self, item_id: Id, qty: i64) -> LineFigures {
        self.get(item_id)
            .map(|entry| entry.model.figures(qty))
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[CostEntry] {
        &self.entries
    }

    pub fn active(&self) -> impl Iterator<Item = &CostEntry> {
        self.entries.iter().filter(|e| e.item.is_active)
    }
}

pub struct RecipeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Set the grams of an ingredient in an item, creating the component if
    /// needed. Both sides must belong to `user_id`.
    pub async fn upsert(
        &self,
        user_id: Id,
        item_id: Id,
        ingredient_id: Id,
        grams_per_unit: Amount,
    ) -> Result<RecipeComponent, DbError> {
        ItemRepo::new(self.pool).get(user_id, item_id).await?;
        IngredientRepo::new(self.pool).get(user_id, ingredient_id).await?;

        let component = sqlx::query_as(
            r#"
            WITH upserted AS (
                INSERT INTO recipe_components (item_id, ingredient_id, grams_per_unit)
                VALUES ($1, $2, $3)
                ON CONFLICT (item_id, ingredient_id)
                DO UPDATE SET grams_per_unit = EXCLUDED.grams_per_unit
                RETURNING id, item_id, ingredient_id, grams_per_unit
            )
            SELECT u.id, u.item_id, u.ingredient_id, g.name AS ingredient_name,
                   u.grams_per_unit, g.cost_per_gram
            FROM upserted u
            JOIN ingredients g ON g.id = u.ingredient_id
            "#,
        )
        .bind(item_id)
        .bind(ingredient_id)
        .bind(grams_per_unit.get())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(user_id, item_id, ingredient_id, "recipe component saved");
        Ok(component)
    }

    pub async fn remove(&self, user_id: Id, item_id: Id, ingredient_id: Id) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM recipe_components rc
            USING items i
            WHERE rc.item_id = i.id
              AND i.user_id = $1
              AND rc.item_id = $2
              AND rc.ingredient_id = $3
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(ingredient_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "recipe component",
                format!("{item_id}/{ingredient_id}"),
            ));
        }
        Ok(())
    }

    /// All components of all items owned by `user_id`.
    pub async fn list_for_user(&self, user_id: Id) -> Result<Vec<RecipeComponent>, DbError> {
        let components = sqlx::query_as(
            r#"
            SELECT rc.id, rc.item_id, rc.ingredient_id, g.name AS ingredient_name,
                   rc.grams_per_unit, g.cost_per_gram
            FROM recipe_components rc
            JOIN items i ON i.id = rc.item_id
            JOIN ingredients g ON g.id = rc.ingredient_id
            WHERE i.user_id = $1
            ORDER BY rc.item_id, g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(components)
    }

    /// Items plus recipes for `user_id` in two queries.
    pub async fn cost_book(&self, user_id: Id) -> Result<CostBook, DbError> {
        let items = ItemRepo::new(self.pool).list(user_id).await?;
        let components = self.list_for_user(user_id).await?;
        Ok(CostBook::build(items, components)?)
    }
}
