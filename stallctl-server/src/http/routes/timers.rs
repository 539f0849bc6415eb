//! Timer log endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stallctl_core::TimerKind;

use crate::db::repos::{Id, TimerLog, TimerRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{ListLimit, Memo, TimerDuration, ValidationError};

#[derive(Deserialize)]
pub struct CreateTimerLogRequest {
    pub timer_type: String,
    pub duration_seconds: i32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub memo: String,
}

#[derive(Deserialize, Default)]
pub struct TimerLogQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct TimerLogResponse {
    pub id: Id,
    pub timer_type: String,
    pub duration_seconds: i32,
    pub started_at: String,
    pub completed_at: String,
    pub memo: String,
}

impl From<TimerLog> for TimerLogResponse {
    fn from(log: TimerLog) -> Self {
        Self {
            id: log.id,
            timer_type: log.timer_type,
            duration_seconds: log.duration_seconds,
            started_at: log.started_at.to_rfc3339(),
            completed_at: log.completed_at.to_rfc3339(),
            memo: log.memo,
        }
    }
}

fn parse_kind(value: &str) -> Result<TimerKind, ValidationError> {
    value.parse().map_err(|_| ValidationError::InvalidVariant {
        field: "timer type",
        value: value.to_owned(),
    })
}

/// GET /timer-logs?limit= - most recent first
async fn list_timer_logs(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidQuery(query): ValidQuery<TimerLogQuery>,
) -> Result<Json<Vec<TimerLogResponse>>, ApiError> {
    let limit = ListLimit::new(query.limit);
    let logs = TimerRepo::new(&state.pool).list(user.id, limit.get()).await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// POST /timer-logs
async fn create_timer_log(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidJson(req): ValidJson<CreateTimerLogRequest>,
) -> Result<(StatusCode, Json<TimerLogResponse>), ApiError> {
    let kind = parse_kind(&req.timer_type)?;
    let duration = TimerDuration::new(req.duration_seconds)?;
    let memo = Memo::new(&req.memo)?;

    let log = TimerRepo::new(&state.pool)
        .create(user.id, kind, duration.get(), req.started_at, memo.as_str())
        .await?;
    Ok((StatusCode::CREATED, Json(log.into())))
}

/// Timer log routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/timer-logs", get(list_timer_logs).post(create_timer_log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_is_validation_error() {
        assert_eq!(parse_kind("stopwatch").unwrap(), TimerKind::Stopwatch);
        assert!(matches!(
            parse_kind("egg"),
            Err(ValidationError::InvalidVariant { field: "timer type", .. })
        ));
    }
}
