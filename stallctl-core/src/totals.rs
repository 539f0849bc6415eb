//! Day and period aggregates

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::LineFigures;

/// Summed figures across several sales counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub qty: i64,
    #[serde(serialize_with = "crate::money::serialize")]
    pub revenue: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    pub material_cost: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    pub margin: Decimal,
}

impl AddAssign<LineFigures> for Totals {
    fn add_assign(&mut self, line: LineFigures) {
        self.qty += line.qty;
        self.revenue += line.revenue;
        self.material_cost += line.material_cost;
        self.margin = self.revenue - self.material_cost;
    }
}

impl AddAssign<Totals> for Totals {
    fn add_assign(&mut self, other: Totals) {
        self.qty += other.qty;
        self.revenue += other.revenue;
        self.material_cost += other.material_cost;
        self.margin = self.revenue - self.material_cost;
    }
}

impl Sum<LineFigures> for Totals {
    fn sum<I: Iterator<Item = LineFigures>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for line in iter {
            totals += line;
        }
        totals
    }
}

impl Sum<Totals> for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for t in iter {
            totals += t;
        }
        totals
    }
}

/// Quantity and revenue for one item name over a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStat {
    pub qty: i64,
    #[serde(serialize_with = "crate::money::serialize")]
    pub revenue: Decimal,
}

/// Per-item statistics keyed by item name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStats(BTreeMap<String, ItemStat>);

impl ItemStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, line: &LineFigures) {
        let stat = self.0.entry(name.to_owned()).or_default();
        stat.qty += line.qty;
        stat.revenue += line.revenue;
    }

    pub fn get(&self, name: &str) -> Option<&ItemStat> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
