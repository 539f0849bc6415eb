//! Report queries
//!
//! Read-only loads for the calendar, dashboard and day views. Aggregation
//! happens in `crate::report` against a `CostBook`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use stallctl_core::DateRange;

use super::{DbError, Id};

/// A sales day with its per-item quantities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCounts {
    pub day_id: Id,
    pub date: NaiveDate,
    /// `(item_id, qty_units)`
    pub counts: Vec<(Id, i32)>,
}

/// One row of the sales event log
#[derive(Debug, Clone, FromRow)]
pub struct LoggedEvent {
    pub item_id: Id,
    pub delta: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct DayCountRow {
    day_id: Id,
    date: NaiveDate,
    item_id: Option<Id>,
    qty_units: Option<i32>,
}

/// Fold day/count join rows (ordered by day) into one entry per day.
fn group_by_day(rows: Vec<DayCountRow>) -> Vec<DayCounts> {
    let mut days: Vec<DayCounts> = Vec::new();
    for row in rows {
        if days.last().map(|d| d.day_id) != Some(row.day_id) {
            days.push(DayCounts {
                day_id: row.day_id,
                date: row.date,
                counts: Vec::new(),
            });
        }
        if let (Some(item_id), Some(qty), Some(day)) = (row.item_id, row.qty_units, days.last_mut()) {
            day.counts.push((item_id, qty));
        }
    }
    days
}

pub struct ReportRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every sales day of `user_id` within `range`, including days without
    /// any counts, in date order.
    pub async fn day_counts_in_range(&self, user_id: Id, range: DateRange) -> Result<Vec<DayCounts>, DbError> {
        let rows: Vec<DayCountRow> = sqlx::query_as(
            r#"
            SELECT d.id AS day_id, d.date, c.item_id, c.qty_units
            FROM sales_days d
            LEFT JOIN sales_counts c ON c.sales_day_id = d.id
            WHERE d.user_id = $1
              AND ($2::date IS NULL OR d.date >= $2)
              AND ($3::date IS NULL OR d.date <= $3)
            ORDER BY d.date, d.id, c.item_id
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.pool)
        .await?;

        Ok(group_by_day(rows))
    }

    /// Positive deltas logged on `user_id`'s days within `range`.
    pub async fn positive_events_in_range(
        &self,
        user_id: Id,
        range: DateRange,
    ) -> Result<Vec<LoggedEvent>, DbError> {
        let events = sqlx::query_as(
            r#"
            SELECT e.item_id, e.delta, e.created_at
            FROM sales_events e
            JOIN sales_days d ON d.id = e.sales_day_id
            WHERE d.user_id = $1
              AND e.delta > 0
              AND ($2::date IS NULL OR d.date >= $2)
              AND ($3::date IS NULL OR d.date <= $3)
            ORDER BY e.created_at
            "#,
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(self.pool)
        .await?;
        Ok(events)
    }

    pub async fn events_for_day(&self, day_id: Id) -> Result<Vec<LoggedEvent>, DbError> {
        let events = sqlx::query_as(
            r#"
            SELECT item_id, delta, created_at
            FROM sales_events
            WHERE sales_day_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(day_id)
        .fetch_all(self.pool)
        .await?;
        Ok(events)
    }
}
