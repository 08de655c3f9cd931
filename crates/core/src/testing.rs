//! Fixture catalog shared by unit and HTTP tests.

use std::sync::Arc;

use crate::{Catalog, FeatureModel, FeatureRange, FoodRecord, MealCategory, Nutrients};

/// Bounds fitted on a small reference dataset, in [`crate::NUMERIC_FEATURES`] order.
#[must_use]
pub fn fixture_model() -> FeatureModel {
  FeatureModel::new(vec![
    FeatureRange::new(0.0, 1000.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(0.0, 100.0),
    FeatureRange::new(0.0, 200.0),
    FeatureRange::new(-1.0, 3.0),
  ])
  .unwrap_or_else(|err| unreachable!("fixture ranges are valid: {err}"))
}

/// Two items per category, interleaved so grouping has to reorder them.
#[must_use]
pub fn fixture_records() -> Vec<FoodRecord> {
  use MealCategory::{Breakfast, Carbs, Drink, LunchDinner, Snack};

  [
    ("Oatmeal with Berries", Breakfast, 250.0, 5.0, 8.0, 40.0),
    ("Grilled Chicken Salad", LunchDinner, 350.0, 12.0, 35.0, 20.0),
    ("Mixed Nuts", Snack, 170.0, 14.0, 6.0, 6.0),
    ("Green Smoothie", Drink, 150.0, 2.0, 4.0, 30.0),
    ("Brown Rice", Carbs, 180.0, 1.0, 4.0, 38.0),
    ("Greek Yogurt with Honey", Breakfast, 180.0, 3.0, 15.0, 25.0),
    ("Salmon with Vegetables", LunchDinner, 420.0, 18.0, 34.0, 15.0),
    ("Apple with Peanut Butter", Snack, 200.0, 8.0, 7.0, 25.0),
    ("Protein Shake", Drink, 220.0, 5.0, 30.0, 15.0),
    ("Sweet Potato", Carbs, 150.0, 0.0, 3.0, 35.0),
  ]
  .into_iter()
  .map(|(name, category, calories, fat, proteins, carbohydrate)| {
    FoodRecord::new(
      name,
      category,
      Nutrients::new(calories, fat, proteins, carbohydrate),
    )
  })
  .collect()
}

#[must_use]
pub fn fixture_catalog() -> Catalog {
  Catalog::build(fixture_records(), Arc::new(fixture_model()))
    .unwrap_or_else(|err| unreachable!("fixture records are valid: {err}"))
}
