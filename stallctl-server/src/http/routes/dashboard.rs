//! Period dashboard endpoint

use std::sync::Arc;

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stallctl_core::{DateRange, Period};

use crate::db::repos::{RecipeRepo, ReportRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidQuery};
use crate::http::server::AppState;
use crate::models::parse_optional_date;
use crate::report::{self, PeriodSummary};

#[derive(Deserialize, Default)]
pub struct DashboardQuery {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DashboardQuery {
    fn period(&self) -> Result<Period, ApiError> {
        let start = parse_optional_date("start_date", self.start_date.as_deref())?;
        let end = parse_optional_date("end_date", self.end_date.as_deref())?;
        Ok(Period::parse(self.period.as_deref(), start, end)?)
    }
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub period: &'static str,
    #[serde(flatten)]
    pub range: DateRange,
    #[serde(flatten)]
    pub summary: PeriodSummary,
}

/// GET /dashboard?period=today|week|month|all|custom&start_date=&end_date=
async fn dashboard(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<DashboardQuery>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let period = query.period()?;
    let range = period.resolve(state.today());

    let reports = ReportRepo::new(&state.pool);
    let days = reports.day_counts_in_range(user.id, range).await?;
    let events = reports.positive_events_in_range(user.id, range).await?;
    let book = RecipeRepo::new(&state.pool).cost_book(user.id).await?;

    tracing::debug!(
        user_id = user.id,
        period = period.as_str(),
        days = days.len(),
        events = events.len(),
        "dashboard loaded"
    );

    Ok(Json(DashboardResponse {
        period: period.as_str(),
        range,
        summary: report::summarize(&book, &days, &events, state.tz),
    }))
}

/// Dashboard routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(period: &str, start: &str, end: &str) -> DashboardQuery {
        DashboardQuery {
            period: Some(period.into()),
            start_date: Some(start.into()),
            end_date: Some(end.into()),
        }
    }

    #[test]
    fn custom_period_with_dates() {
        let period = query("custom", "2025-03-01", "2025-03-10").period().unwrap();
        assert_eq!(
            period,
            Period::Custom {
                start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            }
        );
    }

    #[test]
    fn reversed_range_is_bad_request() {
        let err = query("custom", "2025-03-10", "2025-03-01").period().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn missing_period_is_today() {
        assert_eq!(DashboardQuery::default().period().unwrap(), Period::Today);
    }
}
