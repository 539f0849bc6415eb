//! Timer log repository
//!
//! Completed stopwatch and countdown sessions (e.g. batter resting time).

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use stallctl_core::{CoreError, TimerKind};

use super::{DbError, Id};

const TIMER_COLUMNS: &str = "id, user_id, duration_seconds, timer_type, started_at, completed_at, memo";

#[derive(Debug, Clone, FromRow)]
pub struct TimerLog {
    pub id: Id,
    pub user_id: Id,
    pub duration_seconds: i32,
    pub timer_type: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub memo: String,
}

impl TimerLog {
    pub fn kind(&self) -> Result<TimerKind, CoreError> {
        self.timer_type.parse()
    }
}

pub struct TimerRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TimerRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Id,
        kind: TimerKind,
        duration_seconds: i32,
        started_at: DateTime<Utc>,
        memo: &str,
    ) -> Result<TimerLog, DbError> {
        let log = sqlx::query_as(&format!(
            r#"
            INSERT INTO timer_logs (user_id, duration_seconds, timer_type, started_at, memo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TIMER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(duration_seconds)
        .bind(kind.as_str())
        .bind(started_at)
        .bind(memo)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(user_id, %kind, duration_seconds, "timer logged");
        Ok(log)
    }

    /// Most recently completed sessions first.
    pub async fn list(&self, user_id: Id, limit: i64) -> Result<Vec<TimerLog>, DbError> {
        let logs = sqlx::query_as(&format!(
            r#"
            SELECT {TIMER_COLUMNS} FROM timer_logs
            WHERE user_id = $1
            ORDER BY completed_at DESC, id DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_stored_type() {
        let log = TimerLog {
            id: 1,
            user_id: 1,
            duration_seconds: 90,
            timer_type: "countdown".into(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            memo: String::new(),
        };
        assert_eq!(log.kind().unwrap(), TimerKind::Countdown);
    }
}
