//! Sale counting endpoints
//!
//! The counter buttons call these with the item and number of units. Both
//! answer with the item's new count and the day totals so the page can
//! refresh without another request.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stallctl_core::money;

use crate::db::repos::{Id, RecipeRepo, SaleOutcome, SalesRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidPath, ValidQuery};
use crate::http::server::AppState;
use crate::models::{parse_optional_date, SaleDelta};
use crate::report;

#[derive(Deserialize, Default)]
pub struct SaleQuery {
    pub date: Option<String>,
}

/// Counter state after a sale or undo
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub date: NaiveDate,
    pub item_id: Id,
    pub item_qty: i32,
    #[serde(serialize_with = "money::serialize")]
    pub item_revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub item_margin: Decimal,
    pub total_qty: i64,
    #[serde(serialize_with = "money::serialize")]
    pub total_revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub total_margin: Decimal,
}

/// Date from `?date=`, or today in the stall's timezone.
fn sale_date(state: &AppState, query: &SaleQuery) -> Result<NaiveDate, ApiError> {
    Ok(parse_optional_date("date", query.date.as_deref())?.unwrap_or_else(|| state.today()))
}

/// Reprice the whole day after the counter changed.
async fn respond(state: &AppState, user: &CurrentUser, outcome: SaleOutcome) -> Result<Json<SaleResponse>, ApiError> {
    let book = RecipeRepo::new(&state.pool).cost_book(user.id).await?;
    let counts: Vec<(Id, i32)> = SalesRepo::new(&state.pool)
        .counts_for_day(outcome.day.id)
        .await?
        .into_iter()
        .map(|c| (c.item_id, c.qty_units))
        .collect();

    let item = book.figures(outcome.item_id, i64::from(outcome.item_qty));
    let totals = report::totals_for(&book, &counts);

    Ok(Json(SaleResponse {
        date: outcome.day.date,
        item_id: outcome.item_id,
        item_qty: outcome.item_qty,
        item_revenue: item.revenue,
        item_margin: item.margin,
        total_qty: totals.qty,
        total_revenue: totals.revenue,
        total_cost: totals.material_cost,
        total_margin: totals.margin,
    }))
}

/// POST /sales/add/{item_id}/{delta}?date=YYYY-MM-DD
async fn add_sale(
    State(state): State<Arc<AppState>>,
    ValidPath((item_id, delta)): ValidPath<(Id, i32)>,
    ValidQuery(query): ValidQuery<SaleQuery>,
    user: CurrentUser,
) -> Result<Json<SaleResponse>, ApiError> {
    let delta = SaleDelta::new(delta)?;
    let date = sale_date(&state, &query)?;

    let outcome = SalesRepo::new(&state.pool)
        .record_sale(user.id, item_id, date, delta)
        .await?;
    respond(&state, &user, outcome).await
}

/// POST /sales/undo/{item_id}/{delta}?date=YYYY-MM-DD
async fn undo_sale(
    State(state): State<Arc<AppState>>,
    ValidPath((item_id, delta)): ValidPath<(Id, i32)>,
    ValidQuery(query): ValidQuery<SaleQuery>,
    user: CurrentUser,
) -> Result<Json<SaleResponse>, ApiError> {
    let amount = SaleDelta::new(delta)?;
    let date = sale_date(&state, &query)?;

    let outcome = SalesRepo::new(&state.pool)
        .undo_sale(user.id, item_id, date, amount)
        .await?;
    respond(&state, &user, outcome).await
}

/// Sales routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sales/add/{item_id}/{delta}", post(add_sale))
        .route("/sales/undo/{item_id}/{delta}", post(undo_sale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/stallctl_unused")
            .unwrap();
        AppState::new(pool, chrono_tz::Asia::Seoul)
    }

    #[tokio::test]
    async fn explicit_date_wins() {
        let query = SaleQuery {
            date: Some("2025-03-14".into()),
        };
        assert_eq!(
            sale_date(&state(), &query).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
    }

    #[tokio::test]
    async fn missing_date_is_today() {
        let state = state();
        assert_eq!(sale_date(&state, &SaleQuery::default()).unwrap(), state.today());
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let query = SaleQuery {
            date: Some("yesterday".into()),
        };
        assert!(matches!(sale_date(&state(), &query), Err(ApiError::Validation(_))));
    }

    #[test]
    fn money_is_serialized_in_cents() {
        let third = Decimal::from(4000) / Decimal::from(3);
        let response = SaleResponse {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            item_id: 1,
            item_qty: 2,
            item_revenue: third,
            item_margin: third,
            total_qty: 2,
            total_revenue: third,
            total_cost: Decimal::ZERO,
            total_margin: third,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["item_revenue"], "1333.33");
        assert_eq!(json["total_margin"], "1333.33");
        assert_eq!(json["total_cost"], "0");
    }
}
