//! Monthly calendar endpoint

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use stallctl_core::{month_bounds, DateRange};

use crate::db::repos::{RecipeRepo, ReportRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidQuery};
use crate::http::server::AppState;
use crate::report::{self, CalendarDay};

#[derive(Deserialize, Default)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Keyed by day of month; days never opened are absent
    pub days: BTreeMap<u32, CalendarDay>,
}

/// GET /calendar?year=&month= - defaults to the current month
async fn calendar(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<CalendarQuery>,
    user: CurrentUser,
) -> Result<Json<CalendarResponse>, ApiError> {
    let today = state.today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let (start_date, end_date) = month_bounds(year, month)?;

    let days = ReportRepo::new(&state.pool)
        .day_counts_in_range(user.id, DateRange::new(start_date, end_date))
        .await?;
    let book = RecipeRepo::new(&state.pool).cost_book(user.id).await?;

    Ok(Json(CalendarResponse {
        year,
        month,
        start_date,
        end_date,
        days: report::calendar_days(&book, &days),
    }))
}

/// Calendar routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/calendar", get(calendar))
}
