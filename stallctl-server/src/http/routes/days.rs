//! Day detail endpoints
//!
//! Opening a day creates it along with zero counts for every active item,
//! so the counter page always has a row per product.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stallctl_core::{money, IngredientUsage, Totals};

use crate::db::repos::{CostBook, Id, RecipeRepo, ReportRepo, SalesCount, SalesRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidPath};
use crate::http::server::AppState;
use crate::models::{parse_date, Memo};
use crate::report;

/// Count and figures for one active item
#[derive(Debug, Serialize)]
pub struct DayItem {
    pub item_id: Id,
    pub name: String,
    pub bundle_size: i32,
    pub bundle_price: Decimal,
    pub qty: i32,
    #[serde(serialize_with = "money::serialize")]
    pub revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub material_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub margin: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: NaiveDate,
    pub memo: String,
    pub items: Vec<DayItem>,
    pub totals: Totals,
    pub time_data: Vec<(String, i64)>,
    pub ingredient_usage: IngredientUsage,
}

#[derive(Deserialize)]
pub struct MemoRequest {
    pub memo: String,
}

#[derive(Serialize)]
pub struct MemoResponse {
    pub date: NaiveDate,
    pub memo: String,
}

/// Rows for active items in name order; inactive items still count toward totals.
fn day_items(book: &CostBook, counts: &[SalesCount]) -> Vec<DayItem> {
    book.active()
        .map(|entry| {
            let qty = counts
                .iter()
                .find(|c| c.item_id == entry.item.id)
                .map_or(0, |c| c.qty_units);
            let figures = entry.model.figures(i64::from(qty));
            DayItem {
                item_id: entry.item.id,
                name: entry.item.name.clone(),
                bundle_size: entry.item.bundle_size,
                bundle_price: entry.item.bundle_price,
                qty,
                revenue: figures.revenue,
                material_cost: figures.material_cost,
                margin: figures.margin,
            }
        })
        .collect()
}

/// GET /days/{date}
async fn day_detail(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidPath(date): ValidPath<String>,
) -> Result<Json<DayResponse>, ApiError> {
    let date = parse_date("date", &date)?;

    let sales = SalesRepo::new(&state.pool);
    let day = sales.get_or_create_day(user.id, date).await?;
    let created = sales.ensure_counts(user.id, day.id).await?;
    if created > 0 {
        tracing::debug!(user_id = user.id, %date, created, "zero counts created");
    }

    let counts = sales.counts_for_day(day.id).await?;
    let book = RecipeRepo::new(&state.pool).cost_book(user.id).await?;
    let events = ReportRepo::new(&state.pool).events_for_day(day.id).await?;

    let pairs: Vec<(Id, i32)> = counts.iter().map(|c| (c.item_id, c.qty_units)).collect();

    Ok(Json(DayResponse {
        date: day.date,
        memo: day.memo,
        items: day_items(&book, &counts),
        totals: report::totals_for(&book, &pairs),
        time_data: report::time_series(state.tz, &events),
        ingredient_usage: report::usage_for(&book, &pairs),
    }))
}

/// PUT /days/{date}/memo
async fn set_memo(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidPath(date): ValidPath<String>,
    ValidJson(req): ValidJson<MemoRequest>,
) -> Result<Json<MemoResponse>, ApiError> {
    let date = parse_date("date", &date)?;
    let memo = Memo::new(&req.memo)?;

    let day = SalesRepo::new(&state.pool)
        .set_memo(user.id, date, memo.as_str())
        .await?;
    Ok(Json(MemoResponse {
        date: day.date,
        memo: day.memo,
    }))
}

/// Day routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/days/{date}", get(day_detail))
        .route("/days/{date}/memo", put(set_memo))
}
