//! Connection pool
//!
//! The pool size comes from `max_connections` in the stall config; a tap on
//! the counter should fail fast rather than queue behind a stuck connection.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool size when the config does not say otherwise
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a request waits for a free connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect with the default pool size.
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/stallctl").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Connect with an explicit pool size (clamped to at least one).
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(max_connections, "connecting to database");
    options(max_connections).connect(database_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_connections_is_clamped() {
        let opts = options(0);
        assert_eq!(opts.get_max_connections(), 1);
        assert_eq!(opts.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }
}
