//! Recipe cost model
//!
//! Items are sold in bundles (e.g. 3 pieces for 2000) while ingredients are
//! priced per gram. Everything is computed in `Decimal` so that revenue and
//! margin sums stay exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Bundle pricing for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPricing {
    bundle_size: i32,
    bundle_price: Decimal,
}

impl ItemPricing {
    pub fn new(bundle_size: i32, bundle_price: Decimal) -> Result<Self> {
        if bundle_size <= 0 {
            return Err(CoreError::InvalidBundleSize { size: bundle_size });
        }
        if bundle_price < Decimal::ZERO {
            return Err(CoreError::NegativeAmount {
                field: "bundle price",
            });
        }
        Ok(Self {
            bundle_size,
            bundle_price,
        })
    }

    pub fn bundle_size(&self) -> i32 {
        self.bundle_size
    }

    pub fn bundle_price(&self) -> Decimal {
        self.bundle_price
    }

    /// Price of a single unit.
    pub fn unit_price(&self) -> Decimal {
        self.bundle_price / Decimal::from(self.bundle_size)
    }

    /// Revenue for `qty` units, multiplied before dividing so whole bundles
    /// come out exact.
    pub fn revenue(&self, qty: i64) -> Decimal {
        self.bundle_price * Decimal::from(qty) / Decimal::from(self.bundle_size)
    }
}

/// One ingredient's contribution to a unit of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub ingredient: String,
    pub grams_per_unit: Decimal,
    pub cost_per_gram: Decimal,
}

impl RecipeLine {
    pub fn cost_per_unit(&self) -> Decimal {
        self.grams_per_unit * self.cost_per_gram
    }
}

/// Pricing plus recipe for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostModel {
    pub pricing: ItemPricing,
    pub recipe: Vec<RecipeLine>,
}

/// Revenue/cost/margin for a quantity of one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFigures {
    pub qty: i64,
    #[serde(serialize_with = "crate::money::serialize")]
    pub revenue: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    pub material_cost: Decimal,
    #[serde(serialize_with = "crate::money::serialize")]
    pub margin: Decimal,
}

impl CostModel {
    pub fn new(pricing: ItemPricing) -> Self {
        Self {
            pricing,
            recipe: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: RecipeLine) -> Self {
        self.recipe.push(line);
        self
    }

    /// Material cost of one unit; zero for an item without a recipe.
    pub fn material_cost_per_unit(&self) -> Decimal {
        self.recipe.iter().map(RecipeLine::cost_per_unit).sum()
    }

    pub fn margin_per_unit(&self) -> Decimal {
        self.pricing.unit_price() - self.material_cost_per_unit()
    }

    /// Figures for `qty` units sold.
    pub fn figures(&self, qty: i64) -> LineFigures {
        let revenue = self.pricing.revenue(qty);
        let material_cost = self.material_cost_per_unit() * Decimal::from(qty);
        LineFigures {
            qty,
            revenue,
            material_cost,
            margin: revenue - material_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn red_bean() -> CostModel {
        CostModel::new(ItemPricing::new(3, dec!(2000)).unwrap())
            .with_line(RecipeLine {
                ingredient: "flour".into(),
                grams_per_unit: dec!(20),
                cost_per_gram: dec!(2.5),
            })
            .with_line(RecipeLine {
                ingredient: "red bean paste".into(),
                grams_per_unit: dec!(30),
                cost_per_gram: dec!(4),
            })
    }

    #[test]
    fn rejects_non_positive_bundle() {
        assert_eq!(
            ItemPricing::new(0, dec!(1000)),
            Err(CoreError::InvalidBundleSize { size: 0 })
        );
        assert!(ItemPricing::new(-2, dec!(1000)).is_err());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(matches!(
            ItemPricing::new(3, dec!(-1)),
            Err(CoreError::NegativeAmount { .. })
        ));
        assert!(ItemPricing::new(3, dec!(0)).is_ok());
    }

    #[test]
    fn unit_price_divides_bundle() {
        let pricing = ItemPricing::new(4, dec!(3000)).unwrap();
        assert_eq!(pricing.unit_price(), dec!(750));
    }

    #[test]
    fn whole_bundles_are_exact() {
        let pricing = ItemPricing::new(3, dec!(2000)).unwrap();
        assert_eq!(pricing.revenue(6), dec!(4000));
        assert_eq!(pricing.revenue(0), dec!(0));
    }

    #[test]
    fn material_cost_sums_recipe() {
        let model = red_bean();
        // 20g * 2.5 + 30g * 4
        assert_eq!(model.material_cost_per_unit(), dec!(170));
    }

    #[test]
    fn empty_recipe_costs_nothing() {
        let model = CostModel::new(ItemPricing::new(2, dec!(1000)).unwrap());
        assert_eq!(model.material_cost_per_unit(), Decimal::ZERO);
        assert_eq!(model.margin_per_unit(), dec!(500));
    }

    #[test]
    fn figures_for_quantity() {
        let figures = red_bean().figures(3);
        assert_eq!(figures.qty, 3);
        assert_eq!(figures.revenue, dec!(2000));
        assert_eq!(figures.material_cost, dec!(510));
        assert_eq!(figures.margin, dec!(1490));
    }
}
