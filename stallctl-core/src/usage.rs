//! Ingredient consumption derived from sold quantities

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cost::CostModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageFigures {
    pub grams: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    pub cost: Decimal,
}

/// Grams and cost per ingredient name, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientUsage(BTreeMap<String, UsageFigures>);

impl IngredientUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the ingredients consumed by `qty` units of an item.
    pub fn accumulate(&mut self, model: &CostModel, qty: i64) {
        let qty = Decimal::from(qty);
        for line in &model.recipe {
            let grams = line.grams_per_unit * qty;
            let entry = self.0.entry(line.ingredient.clone()).or_default();
            entry.grams += grams;
            entry.cost += grams * line.cost_per_gram;
        }
    }

    pub fn get(&self, ingredient: &str) -> Option<&UsageFigures> {
        self.0.get(ingredient)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UsageFigures)> {
        self.0.iter()
    }
}
