//! Report assembly
//!
//! Turns rows loaded by the repositories into day, calendar and period
//! figures. Everything here is synchronous; pricing comes from a `CostBook`
//! so no query runs per count.

use std::collections::BTreeMap;

use chrono::Datelike;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use stallctl_core::{money, IngredientUsage, ItemStats, LineFigures, TimeDistribution, Totals};

use crate::db::{CostBook, DayCounts, Id, LoggedEvent};

/// Totals over `(item_id, qty)` pairs.
pub fn totals_for(book: &CostBook, counts: &[(Id, i32)]) -> Totals {
    counts
        .iter()
        .map(|&(item_id, qty)| book.figures(item_id, i64::from(qty)))
        .sum()
}

/// Ingredient consumption over `(item_id, qty)` pairs.
pub fn usage_for(book: &CostBook, counts: &[(Id, i32)]) -> IngredientUsage {
    let mut usage = IngredientUsage::new();
    for &(item_id, qty) in counts {
        if let Some(entry) = book.get(item_id) {
            usage.accumulate(&entry.model, i64::from(qty));
        }
    }
    usage
}

/// Bucket positive events by local time of day.
pub fn time_series<'a>(tz: Tz, events: impl IntoIterator<Item = &'a LoggedEvent>) -> Vec<(String, i64)> {
    let mut dist = TimeDistribution::new(tz);
    for event in events {
        dist.record(event.created_at, event.delta);
    }
    dist.into_series()
}

/// One calendar cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    #[serde(serialize_with = "money::serialize")]
    pub revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    pub margin: Decimal,
    pub qty: i64,
}

/// Day-of-month to figures, for every existing sales day.
pub fn calendar_days(book: &CostBook, days: &[DayCounts]) -> BTreeMap<u32, CalendarDay> {
    days.iter()
        .map(|day| {
            let totals = totals_for(book, &day.counts);
            let cell = CalendarDay {
                revenue: totals.revenue,
                margin: totals.margin,
                qty: totals.qty,
            };
            (day.date.day(), cell)
        })
        .collect()
}

/// Aggregates over a run of sales days
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeriodSummary {
    pub totals: Totals,
    pub item_stats: ItemStats,
    pub time_data: Vec<(String, i64)>,
    pub ingredient_usage: IngredientUsage,
}

pub fn summarize(book: &CostBook, days: &[DayCounts], events: &[LoggedEvent], tz: Tz) -> PeriodSummary {
    let mut totals = Totals::default();
    let mut item_stats = ItemStats::new();
    let mut ingredient_usage = IngredientUsage::new();

    for &(item_id, qty) in days.iter().flat_map(|d| d.counts.iter()) {
        let Some(entry) = book.get(item_id) else {
            continue;
        };
        let figures: LineFigures = entry.model.figures(i64::from(qty));
        totals += figures;
        item_stats.record(&entry.item.name, &figures);
        ingredient_usage.accumulate(&entry.model, i64::from(qty));
    }

    PeriodSummary {
        totals,
        item_stats,
        time_data: time_series(tz, events),
        ingredient_usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Item, RecipeComponent};
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn book() -> CostBook {
        let item = |id: Id, name: &str| Item {
            id,
            user_id: 1,
            name: name.into(),
            bundle_size: 3,
            bundle_price: dec!(2000),
            is_active: true,
            created_at: Utc::now(),
        };
        let flour = |item_id: Id| RecipeComponent {
            id: item_id,
            item_id,
            ingredient_id: 1,
            ingredient_name: "flour".into(),
            grams_per_unit: dec!(20),
            cost_per_gram: dec!(5),
        };
        CostBook::build(vec![item(1, "custard"), item(2, "red bean")], vec![flour(1), flour(2)]).unwrap()
    }

    fn day(day_id: Id, dom: u32, counts: Vec<(Id, i32)>) -> DayCounts {
        DayCounts {
            day_id,
            date: NaiveDate::from_ymd_opt(2025, 3, dom).unwrap(),
            counts,
        }
    }

    #[test]
    fn totals_over_counts() {
        let totals = totals_for(&book(), &[(1, 3), (2, 6)]);
        assert_eq!(totals.qty, 9);
        assert_eq!(totals.revenue, dec!(6000));
        assert_eq!(totals.material_cost, dec!(900));
        assert_eq!(totals.margin, dec!(5100));
    }

    #[test]
    fn calendar_keys_by_day_of_month() {
        let cells = calendar_days(&book(), &[day(1, 4, vec![(1, 3)]), day(2, 9, vec![])]);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[&4].revenue, dec!(2000));
        assert_eq!(cells[&9], CalendarDay::default());
    }

    #[test]
    fn summary_combines_days() {
        let events = vec![
            LoggedEvent {
                item_id: 1,
                delta: 3,
                created_at: Utc.with_ymd_and_hms(2025, 3, 4, 5, 12, 0).unwrap(),
            },
            LoggedEvent {
                item_id: 2,
                delta: 3,
                created_at: Utc.with_ymd_and_hms(2025, 3, 9, 5, 18, 0).unwrap(),
            },
        ];
        let summary = summarize(
            &book(),
            &[day(1, 4, vec![(1, 3), (2, 0)]), day(2, 9, vec![(2, 3)])],
            &events,
            chrono_tz::Asia::Seoul,
        );

        assert_eq!(summary.totals.qty, 6);
        assert_eq!(summary.item_stats.get("red bean").unwrap().qty, 3);
        assert_eq!(summary.item_stats.get("custard").unwrap().revenue, dec!(2000));
        // 05:12 and 05:18 UTC are both 14:10 in Seoul
        assert_eq!(summary.time_data, vec![("14:10".to_string(), 6)]);
        assert_eq!(summary.ingredient_usage.get("flour").unwrap().grams, dec!(120));
    }

    #[test]
    fn unknown_items_are_skipped() {
        let summary = summarize(&book(), &[day(1, 4, vec![(42, 5)])], &[], chrono_tz::UTC);
        assert_eq!(summary.totals, Totals::default());
        assert!(summary.item_stats.is_empty());
    }
}
