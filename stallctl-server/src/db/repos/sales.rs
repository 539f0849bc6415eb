//! Sales repository
//!
//! Counting happens per (day, item): `sales_counts.qty_units` is the running
//! total and `sales_events` is the append-only log of positive deltas used
//! for time-of-day analysis. Recording and undoing both touch the counter
//! and the log inside one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use stallctl_core::{plan_undo, LoggedDelta};

use super::items::owned_item;
use super::{DbError, Id};
use crate::models::SaleDelta;

const DAY_COLUMNS: &str = "id, user_id, date, memo, created_at";

/// Sales day record (one per user and calendar date)
#[derive(Debug, Clone, FromRow)]
pub struct SalesDay {
    pub id: Id,
    pub user_id: Id,
    pub date: NaiveDate,
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

/// Running total for one item on one day
#[derive(Debug, Clone, FromRow)]
pub struct SalesCount {
    pub id: Id,
    pub sales_day_id: Id,
    pub item_id: Id,
    pub qty_units: i32,
}

/// Counter state after a sale or an undo
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub day: SalesDay,
    pub item_id: Id,
    pub item_qty: i32,
}

pub struct SalesRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SalesRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add `delta` units of an item to a day and log the event.
    pub async fn record_sale(
        &self,
        user_id: Id,
        item_id: Id,
        date: NaiveDate,
        delta: SaleDelta,
    ) -> Result<SaleOutcome, DbError> {
        let mut tx = self.pool.begin().await?;
        owned_item(&mut *tx, user_id, item_id).await?;

        let day = upsert_day(&mut tx, user_id, date).await?;

        let item_qty: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO sales_counts (sales_day_id, item_id, qty_units)
            VALUES ($1, $2, $3)
            ON CONFLICT (sales_day_id, item_id)
            DO UPDATE SET qty_units = sales_counts.qty_units + EXCLUDED.qty_units
            RETURNING qty_units
            "#,
        )
        .bind(day.id)
        .bind(item_id)
        .bind(delta.get())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO sales_events (sales_day_id, item_id, delta) VALUES ($1, $2, $3)")
            .bind(day.id)
            .bind(item_id)
            .bind(delta.get())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id, item_id, %date, delta = delta.get(), item_qty, "sale recorded");
        Ok(SaleOutcome {
            day,
            item_id,
            item_qty,
        })
    }

    /// Undo `amount` units by unwinding the most recent events first.
    ///
    /// The count row is locked for the duration so concurrent taps on the
    /// same item serialize.
    pub async fn undo_sale(
        &self,
        user_id: Id,
        item_id: Id,
        date: NaiveDate,
        amount: SaleDelta,
    ) -> Result<SaleOutcome, DbError> {
        let no_data = || DbError::NoSalesData { item_id, date };

        let mut tx = self.pool.begin().await?;
        owned_item(&mut *tx, user_id, item_id).await?;

        let day: SalesDay = sqlx::query_as(&format!(
            "SELECT {DAY_COLUMNS} FROM sales_days WHERE user_id = $1 AND date = $2"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(no_data)?;

        let (count_id, qty_units): (Id, i32) = sqlx::query_as(
            r#"
            SELECT id, qty_units FROM sales_counts
            WHERE sales_day_id = $1 AND item_id = $2
            FOR UPDATE
            "#,
        )
        .bind(day.id)
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(no_data)?;

        let events: Vec<LoggedDelta> = sqlx::query_as::<_, (Id, i32)>(
            r#"
            SELECT id, delta FROM sales_events
            WHERE sales_day_id = $1 AND item_id = $2 AND delta > 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(day.id)
        .bind(item_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|(id, delta)| LoggedDelta { id, delta })
        .collect();

        // Domain errors drop the transaction, which rolls it back
        let plan = plan_undo(qty_units, &events, amount.get())?;

        if plan.touches_log() {
            sqlx::query("DELETE FROM sales_events WHERE id = ANY($1)")
                .bind(plan.deletions.as_slice())
                .execute(&mut *tx)
                .await?;

            if let Some(reduction) = plan.reduction {
                sqlx::query("UPDATE sales_events SET delta = $2 WHERE id = $1")
                    .bind(reduction.id)
                    .bind(reduction.new_delta)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("UPDATE sales_counts SET qty_units = $2 WHERE id = $1")
            .bind(count_id)
            .bind(plan.new_qty)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            item_id,
            %date,
            amount = amount.get(),
            deleted = plan.deletions.len(),
            reduced = plan.reduction.is_some(),
            unmatched = plan.unmatched,
            item_qty = plan.new_qty,
            "sale undone"
        );
        Ok(SaleOutcome {
            day,
            item_id,
            item_qty: plan.new_qty,
        })
    }

    pub async fn get_or_create_day(&self, user_id: Id, date: NaiveDate) -> Result<SalesDay, DbError> {
        let mut conn = self.pool.acquire().await?;
        Ok(upsert_day(&mut conn, user_id, date).await?)
    }

    /// Create zero counts for every active item missing one on this day.
    /// Returns how many rows were created.
    pub async fn ensure_counts(&self, user_id: Id, day_id: Id) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sales_counts (sales_day_id, item_id)
            SELECT $1, i.id FROM items i
            WHERE i.user_id = $2 AND i.is_active
            ON CONFLICT (sales_day_id, item_id) DO NOTHING
            "#,
        )
        .bind(day_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn counts_for_day(&self, day_id: Id) -> Result<Vec<SalesCount>, DbError> {
        let counts = sqlx::query_as(
            r#"
            SELECT id, sales_day_id, item_id, qty_units
            FROM sales_counts
            WHERE sales_day_id = $1
            ORDER BY item_id
            "#,
        )
        .bind(day_id)
        .fetch_all(self.pool)
        .await?;
        Ok(counts)
    }

    /// Set the memo of a day, creating the day if needed.
    pub async fn set_memo(&self, user_id: Id, date: NaiveDate, memo: &str) -> Result<SalesDay, DbError> {
        let day = sqlx::query_as(&format!(
            r#"
            INSERT INTO sales_days (user_id, date, memo) VALUES ($1, $2, $3)
            ON CONFLICT (user_id, date) DO UPDATE SET memo = EXCLUDED.memo
            RETURNING {DAY_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(date)
        .bind(memo)
        .fetch_one(self.pool)
        .await?;
        Ok(day)
    }
}

/// Get-or-create a sales day on an existing connection or transaction.
async fn upsert_day(conn: &mut PgConnection, user_id: Id, date: NaiveDate) -> Result<SalesDay, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        INSERT INTO sales_days (user_id, date) VALUES ($1, $2)
        ON CONFLICT (user_id, date) DO UPDATE SET date = EXCLUDED.date
        RETURNING {DAY_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(date)
    .fetch_one(conn)
    .await
}
