//! Schema migrations
//!
//! Every statement is idempotent so `run` is safe on each startup.

use sqlx::PgPool;

/// Tables in dependency order
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "items",
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            bundle_size INTEGER NOT NULL DEFAULT 3 CHECK (bundle_size > 0),
            bundle_price NUMERIC(10, 2) NOT NULL CHECK (bundle_price >= 0),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, name)
        )
        "#,
    ),
    (
        "ingredients",
        r#"
        CREATE TABLE IF NOT EXISTS ingredients (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            cost_per_gram NUMERIC(10, 2) NOT NULL CHECK (cost_per_gram >= 0),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, name)
        )
        "#,
    ),
    (
        "recipe_components",
        r#"
        CREATE TABLE IF NOT EXISTS recipe_components (
            id BIGSERIAL PRIMARY KEY,
            item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            ingredient_id BIGINT NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
            grams_per_unit NUMERIC(10, 2) NOT NULL CHECK (grams_per_unit >= 0),
            UNIQUE (item_id, ingredient_id)
        )
        "#,
    ),
    (
        "sales_days",
        r#"
        CREATE TABLE IF NOT EXISTS sales_days (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            memo TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, date)
        )
        "#,
    ),
    (
        "sales_counts",
        r#"
        CREATE TABLE IF NOT EXISTS sales_counts (
            id BIGSERIAL PRIMARY KEY,
            sales_day_id BIGINT NOT NULL REFERENCES sales_days(id) ON DELETE CASCADE,
            item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            qty_units INTEGER NOT NULL DEFAULT 0 CHECK (qty_units >= 0),
            UNIQUE (sales_day_id, item_id)
        )
        "#,
    ),
    (
        "sales_events",
        r#"
        CREATE TABLE IF NOT EXISTS sales_events (
            id BIGSERIAL PRIMARY KEY,
            sales_day_id BIGINT NOT NULL REFERENCES sales_days(id) ON DELETE CASCADE,
            item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
            delta INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "timer_logs",
        r#"
        CREATE TABLE IF NOT EXISTS timer_logs (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            duration_seconds INTEGER NOT NULL CHECK (duration_seconds >= 0),
            timer_type TEXT NOT NULL CHECK (timer_type IN ('stopwatch', 'countdown')),
            started_at TIMESTAMPTZ NOT NULL,
            completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            memo TEXT NOT NULL DEFAULT ''
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_items_user ON items(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_user ON ingredients(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_components_item ON recipe_components(item_id)",
    "CREATE INDEX IF NOT EXISTS idx_sales_days_user_date ON sales_days(user_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_sales_counts_day ON sales_counts(sales_day_id)",
    // Undo walks the log newest first per (day, item)
    "CREATE INDEX IF NOT EXISTS idx_sales_events_day_item ON sales_events(sales_day_id, item_id, created_at DESC, id DESC)",
    "CREATE INDEX IF NOT EXISTS idx_timer_logs_user ON timer_logs(user_id, completed_at DESC)",
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    for (table, ddl) in TABLES {
        tracing::debug!(table, "ensuring table");
        sqlx::query(ddl).execute(pool).await?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Migrations complete");
    Ok(())
}
