//! Repository tests against a real Postgres
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p stallctl-server -- --ignored

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sqlx::PgPool;
use stallctl_core::{CoreError, DateRange, TimerKind};
use stallctl_server::db::{
    create_pool, migrations, DbError, Id, IngredientRepo, ItemRepo, ItemUpdate, RecipeRepo, ReportRepo,
    SalesRepo, TimerRepo, UserRepo,
};
use stallctl_server::models::{Amount, BundleSize, IngredientName, ItemName, SaleDelta};

async fn setup() -> (PgPool, Id) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool");
    migrations::run(&pool).await.expect("migrations");

    let user = UserRepo::new(&pool).create(&unique_username()).await.expect("user");
    (pool, user.id)
}

/// Each test gets a fresh owner so runs never collide on unique names.
fn unique_username() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test-{}-{}-{}", std::process::id(), nanos, NEXT.fetch_add(1, Ordering::Relaxed))
}

async fn custard(pool: &PgPool, user_id: Id) -> Id {
    item(pool, user_id, "custard").await
}

async fn item(pool: &PgPool, user_id: Id, name: &str) -> Id {
    ItemRepo::new(pool)
        .create(
            user_id,
            &ItemName::new(name).unwrap(),
            BundleSize::DEFAULT,
            Amount::new("bundle price", dec!(2000)).unwrap(),
        )
        .await
        .expect("item")
        .id
}

async fn ingredient(pool: &PgPool, user_id: Id, name: &str) -> Id {
    IngredientRepo::new(pool)
        .create(
            user_id,
            &IngredientName::new(name).unwrap(),
            Amount::new("cost per gram", dec!(5)).unwrap(),
        )
        .await
        .expect("ingredient")
        .id
}

async fn other_user(pool: &PgPool) -> Id {
    UserRepo::new(pool).create(&unique_username()).await.expect("user").id
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn delta(n: i32) -> SaleDelta {
    SaleDelta::new(n).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn undo_unwinds_most_recent_events() {
    let (pool, user_id) = setup().await;
    let item_id = custard(&pool, user_id).await;
    let sales = SalesRepo::new(&pool);

    for n in [3, 2, 4] {
        sales.record_sale(user_id, item_id, day(), delta(n)).await.unwrap();
    }

    // 4 is consumed whole, 2 is reduced to 1
    let outcome = sales.undo_sale(user_id, item_id, day(), delta(5)).await.unwrap();
    assert_eq!(outcome.item_qty, 4);

    let events = ReportRepo::new(&pool).events_for_day(outcome.day.id).await.unwrap();
    let deltas: Vec<i32> = events.iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![3, 1]);
    assert_eq!(deltas.iter().sum::<i32>(), outcome.item_qty);
}

#[tokio::test]
#[ignore = "requires database"]
async fn over_undo_changes_nothing() {
    let (pool, user_id) = setup().await;
    let item_id = custard(&pool, user_id).await;
    let sales = SalesRepo::new(&pool);

    let recorded = sales.record_sale(user_id, item_id, day(), delta(2)).await.unwrap();
    let err = sales.undo_sale(user_id, item_id, day(), delta(3)).await.unwrap_err();
    assert!(matches!(
        err,
        DbError::Domain(CoreError::InsufficientQuantity {
            requested: 3,
            available: 2
        })
    ));

    let counts = sales.counts_for_day(recorded.day.id).await.unwrap();
    assert_eq!(counts[0].qty_units, 2);
}

#[tokio::test]
#[ignore = "requires database"]
async fn undo_without_sales_is_no_data() {
    let (pool, user_id) = setup().await;
    let item_id = custard(&pool, user_id).await;

    let err = SalesRepo::new(&pool)
        .undo_sale(user_id, item_id, day(), delta(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NoSalesData { .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn cost_book_and_reports() {
    let (pool, user_id) = setup().await;
    let item_id = custard(&pool, user_id).await;
    let flour = IngredientRepo::new(&pool)
        .create(
            user_id,
            &IngredientName::new("flour").unwrap(),
            Amount::new("cost per gram", dec!(5)).unwrap(),
        )
        .await
        .unwrap();
    RecipeRepo::new(&pool)
        .upsert(user_id, item_id, flour.id, Amount::new("grams", dec!(20)).unwrap())
        .await
        .unwrap();

    SalesRepo::new(&pool)
        .record_sale(user_id, item_id, day(), delta(6))
        .await
        .unwrap();

    let book = RecipeRepo::new(&pool).cost_book(user_id).await.unwrap();
    let figures = book.figures(item_id, 6);
    assert_eq!(figures.revenue, dec!(4000));
    assert_eq!(figures.material_cost, dec!(600));

    let days = ReportRepo::new(&pool)
        .day_counts_in_range(user_id, DateRange::single(day()))
        .await
        .unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].counts, vec![(item_id, 6)]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_item_name_conflicts() {
    let (pool, user_id) = setup().await;
    custard(&pool, user_id).await;

    let err = ItemRepo::new(&pool)
        .create(
            user_id,
            &ItemName::new("custard").unwrap(),
            BundleSize::DEFAULT,
            Amount::new("bundle price", dec!(2000)).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict { resource: "item", .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn ensure_counts_covers_active_items_only() {
    let (pool, user_id) = setup().await;
    let custard_id = custard(&pool, user_id).await;
    let walnut_id = item(&pool, user_id, "walnut").await;
    ItemRepo::new(&pool)
        .update(
            user_id,
            walnut_id,
            ItemUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let sales = SalesRepo::new(&pool);
    let sales_day = sales.get_or_create_day(user_id, day()).await.unwrap();
    assert_eq!(sales.ensure_counts(user_id, sales_day.id).await.unwrap(), 1);
    // Idempotent
    assert_eq!(sales.ensure_counts(user_id, sales_day.id).await.unwrap(), 0);

    let counts = sales.counts_for_day(sales_day.id).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].item_id, custard_id);
    assert_eq!(counts[0].qty_units, 0);

    // Same day on the second call
    let again = sales.get_or_create_day(user_id, day()).await.unwrap();
    assert_eq!(again.id, sales_day.id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn sales_on_another_users_item_are_not_found() {
    let (pool, owner_id) = setup().await;
    let item_id = custard(&pool, owner_id).await;
    let intruder_id = other_user(&pool).await;
    let sales = SalesRepo::new(&pool);

    let err = sales
        .record_sale(intruder_id, item_id, day(), delta(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "item", .. }));

    sales.record_sale(owner_id, item_id, day(), delta(2)).await.unwrap();
    let err = sales
        .undo_sale(intruder_id, item_id, day(), delta(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "item", .. }));

    // Nothing leaked into the intruder's books
    let days = ReportRepo::new(&pool)
        .day_counts_in_range(intruder_id, DateRange::unbounded())
        .await
        .unwrap();
    assert!(days.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn recipe_rejects_another_users_ingredient() {
    let (pool, owner_id) = setup().await;
    let item_id = custard(&pool, owner_id).await;
    let other_id = other_user(&pool).await;
    let foreign_flour = ingredient(&pool, other_id, "flour").await;

    let err = RecipeRepo::new(&pool)
        .upsert(owner_id, item_id, foreign_flour, Amount::new("grams", dec!(20)).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { resource: "ingredient", .. }));
    assert!(RecipeRepo::new(&pool).list_for_user(owner_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_update_is_partial_and_renames_conflict() {
    let (pool, user_id) = setup().await;
    let custard_id = custard(&pool, user_id).await;
    let walnut_id = item(&pool, user_id, "walnut").await;
    let items = ItemRepo::new(&pool);

    let updated = items
        .update(
            user_id,
            custard_id,
            ItemUpdate {
                bundle_price: Some(Amount::new("bundle price", dec!(2500)).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "custard");
    assert_eq!(updated.bundle_size, 3);
    assert_eq!(updated.bundle_price, dec!(2500));
    assert!(updated.is_active);

    let err = items
        .update(
            user_id,
            walnut_id,
            ItemUpdate {
                name: Some(ItemName::new("custard").unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict { resource: "item", ref name } if name == "custard"));

    let other_id = other_user(&pool).await;
    let err = items
        .update(other_id, custard_id, ItemUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn ingredient_update_is_partial_and_renames_conflict() {
    let (pool, user_id) = setup().await;
    let flour_id = ingredient(&pool, user_id, "flour").await;
    ingredient(&pool, user_id, "butter").await;
    let ingredients = IngredientRepo::new(&pool);

    let repriced = ingredients
        .update(user_id, flour_id, None, Some(Amount::new("cost per gram", dec!(7)).unwrap()))
        .await
        .unwrap();
    assert_eq!(repriced.name, "flour");
    assert_eq!(repriced.cost_per_gram, dec!(7));

    let butter = IngredientName::new("butter").unwrap();
    let err = ingredients
        .update(user_id, flour_id, Some(&butter), None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Conflict { resource: "ingredient", .. }));

    let unchanged = ingredients.get(user_id, flour_id).await.unwrap();
    assert_eq!(unchanged.name, "flour");
}

#[tokio::test]
#[ignore = "requires database"]
async fn memo_creates_then_overwrites_day() {
    let (pool, user_id) = setup().await;
    let sales = SalesRepo::new(&pool);

    let first = sales.set_memo(user_id, day(), "rain until noon").await.unwrap();
    assert_eq!(first.memo, "rain until noon");

    let second = sales.set_memo(user_id, day(), "sold out by 3pm").await.unwrap();
    assert_eq!(second.id, first.id);

    let stored = sales.get_or_create_day(user_id, day()).await.unwrap();
    assert_eq!(stored.memo, "sold out by 3pm");
}

#[tokio::test]
#[ignore = "requires database"]
async fn event_range_bounds_are_inclusive() {
    let (pool, user_id) = setup().await;
    let item_id = custard(&pool, user_id).await;
    let sales = SalesRepo::new(&pool);

    let d = |n| NaiveDate::from_ymd_opt(2025, 3, n).unwrap();
    for (date, n) in [(d(13), 1), (d(14), 2), (d(15), 4)] {
        sales.record_sale(user_id, item_id, date, delta(n)).await.unwrap();
    }
    // Undo leaves the log at 3 on the 15th
    sales.undo_sale(user_id, item_id, d(15), delta(1)).await.unwrap();

    let reports = ReportRepo::new(&pool);
    let deltas = |events: Vec<stallctl_server::db::LoggedEvent>| -> Vec<i32> {
        events.iter().map(|e| e.delta).collect()
    };

    let middle = reports
        .positive_events_in_range(user_id, DateRange::single(d(14)))
        .await
        .unwrap();
    assert_eq!(deltas(middle), vec![2]);

    let tail = reports
        .positive_events_in_range(user_id, DateRange::new(d(14), d(15)))
        .await
        .unwrap();
    assert_eq!(deltas(tail), vec![2, 3]);

    let from_start = reports
        .positive_events_in_range(
            user_id,
            DateRange {
                start: None,
                end: Some(d(13)),
            },
        )
        .await
        .unwrap();
    assert_eq!(deltas(from_start), vec![1]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn timer_logs_list_latest_first() {
    let (pool, user_id) = setup().await;
    let timers = TimerRepo::new(&pool);
    let started = Utc::now() - Duration::minutes(10);

    let rest = timers
        .create(user_id, TimerKind::Countdown, 600, started, "batter rest")
        .await
        .unwrap();
    let batch = timers
        .create(user_id, TimerKind::Stopwatch, 95, started, "")
        .await
        .unwrap();

    let logs = timers.list(user_id, 10).await.unwrap();
    let ids: Vec<Id> = logs.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![batch.id, rest.id]);
    assert_eq!(logs[1].kind().unwrap(), TimerKind::Countdown);
    assert_eq!(logs[1].memo, "batter rest");

    assert_eq!(timers.list(user_id, 1).await.unwrap().len(), 1);

    let other_id = other_user(&pool).await;
    assert!(timers.list(other_id, 10).await.unwrap().is_empty());
}
