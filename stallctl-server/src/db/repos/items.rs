//! Item repository
//!
//! Products sold at the stall, each priced per bundle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool};
use stallctl_core::{CoreError, ItemPricing};

use super::{DbError, Id};
use crate::models::{Amount, BundleSize, ItemName};

const ITEM_COLUMNS: &str = "id, user_id, name, bundle_size, bundle_price, is_active, created_at";

/// Item record from database
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: Id,
    pub user_id: Id,
    pub name: String,
    pub bundle_size: i32,
    pub bundle_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn pricing(&self) -> Result<ItemPricing, CoreError> {
        ItemPricing::new(self.bundle_size, self.bundle_price)
    }
}

/// Partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<ItemName>,
    pub bundle_size: Option<BundleSize>,
    pub bundle_price: Option<Amount>,
    pub is_active: Option<bool>,
}

pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Id,
        name: &ItemName,
        bundle_size: BundleSize,
        bundle_price: Amount,
    ) -> Result<Item, DbError> {
        let item = sqlx::query_as(&format!(
            r#"
            INSERT INTO items (user_id, name, bundle_size, bundle_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name.as_str())
        .bind(bundle_size.get())
        .bind(bundle_price.get())
        .fetch_one(self.pool)
        .await
        .map_err(DbError::conflict_on_unique("item", name.as_str()))?;

        tracing::info!(user_id, item = name.as_str(), "item created");
        Ok(item)
    }

    /// All items of a user, active and inactive, ordered by name.
    pub async fn list(&self, user_id: Id) -> Result<Vec<Item>, DbError> {
        let items = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE user_id = $1 ORDER BY name"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    pub async fn list_active(&self, user_id: Id) -> Result<Vec<Item>, DbError> {
        let items = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE user_id = $1 AND is_active ORDER BY name"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Get an item owned by `user_id`; other users' items are reported as missing.
    pub async fn get(&self, user_id: Id, item_id: Id) -> Result<Item, DbError> {
        owned_item(self.pool, user_id, item_id).await
    }

    pub async fn update(&self, user_id: Id, item_id: Id, update: ItemUpdate) -> Result<Item, DbError> {
        let conflict_name = update
            .name
            .as_ref()
            .map(|n| n.as_str().to_owned())
            .unwrap_or_default();

        sqlx::query_as(&format!(
            r#"
            UPDATE items SET
                name = COALESCE($3, name),
                bundle_size = COALESCE($4, bundle_size),
                bundle_price = COALESCE($5, bundle_price),
                is_active = COALESCE($6, is_active)
            WHERE id = $1 AND user_id = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item_id)
        .bind(user_id)
        .bind(update.name.as_ref().map(ItemName::as_str))
        .bind(update.bundle_size.map(|s| s.get()))
        .bind(update.bundle_price.map(|p| p.get()))
        .bind(update.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(DbError::conflict_on_unique("item", &conflict_name))?
        .ok_or_else(|| DbError::not_found("item", item_id))
    }
}

/// Owner-scoped lookup on any executor, so transactions can check ownership
/// on the same snapshot they write to.
pub(crate) async fn owned_item<'c, E>(executor: E, user_id: Id, item_id: Id) -> Result<Item, DbError>
where
    E: PgExecutor<'c>,
{
    sqlx::query_as(&format!(
        "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 AND user_id = $2"
    ))
    .bind(item_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DbError::not_found("item", item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(bundle_size: i32, bundle_price: Decimal) -> Item {
        Item {
            id: 1,
            user_id: 1,
            name: "custard".into(),
            bundle_size,
            bundle_price,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pricing_from_row() {
        let pricing = item(3, dec!(2000)).pricing().unwrap();
        assert_eq!(pricing.bundle_size(), 3);
        assert_eq!(pricing.revenue(3), dec!(2000));
    }

    #[test]
    fn corrupt_row_is_rejected() {
        assert!(item(0, dec!(2000)).pricing().is_err());
    }
}
