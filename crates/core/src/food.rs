use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::{EngineError, Result};

/// Guards the density formula against zero-calorie foods.
pub const DENSITY_EPSILON: f64 = 1e-6;

/// Fixed partition of the catalog.
///
/// Declaration order is the dataset's integer coding and the grouping order of
/// every result.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  ToSchema,
  Display,
  EnumString,
  EnumIter,
  EnumCount,
)]
pub enum MealCategory {
  Breakfast,
  Carbs,
  Drink,
  #[serde(rename = "Lunch/Dinner", alias = "Lunch_Dinner")]
  #[strum(to_string = "Lunch/Dinner", serialize = "Lunch_Dinner")]
  LunchDinner,
  Snack,
}

impl MealCategory {
  /// Integer code used by the `Meal Type` dataset column.
  #[must_use]
  pub const fn code(self) -> u8 {
    self as u8
  }

  #[must_use]
  pub const fn from_code(code: u8) -> Option<Self> {
    match code {
      0 => Some(Self::Breakfast),
      1 => Some(Self::Carbs),
      2 => Some(Self::Drink),
      3 => Some(Self::LunchDinner),
      4 => Some(Self::Snack),
      _ => None,
    }
  }

  pub(crate) const fn index(self) -> usize {
    self as usize
  }
}

/// Densities computed with the same formula on the catalog and query side.
#[must_use]
pub fn nutrient_density(calories: f64, fat: f64, proteins: f64, carbohydrate: f64) -> f64 {
  (proteins + carbohydrate - fat) / (calories + DENSITY_EPSILON)
}

/// Raw macro-nutrient values, in kcal and grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
  pub calories: f64,
  pub fat: f64,
  pub proteins: f64,
  pub carbohydrate: f64,
}

impl Nutrients {
  #[must_use]
  pub const fn new(calories: f64, fat: f64, proteins: f64, carbohydrate: f64) -> Self {
    Self {
      calories,
      fat,
      proteins,
      carbohydrate,
    }
  }

  #[must_use]
  pub fn density(&self) -> f64 {
    nutrient_density(self.calories, self.fat, self.proteins, self.carbohydrate)
  }

  /// Name and value of the first field that is negative or not finite.
  #[must_use]
  pub fn first_invalid(&self) -> Option<(&'static str, f64)> {
    [
      ("calories", self.calories),
      ("fat", self.fat),
      ("proteins", self.proteins),
      ("carbohydrate", self.carbohydrate),
    ]
    .into_iter()
    .find(|(_, value)| !value.is_finite() || *value < 0.0)
  }

  /// Raw numeric features in model order.
  pub(crate) const fn features(&self, density: f64) -> [f64; 5] {
    [self.calories, self.fat, self.proteins, self.carbohydrate, density]
  }
}

/// Columns that may be one-hot encoded by a [`crate::FeatureModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum CategoricalColumn {
  #[serde(rename = "Carb_Level")]
  #[strum(serialize = "Carb_Level")]
  CarbLevel,
  #[serde(rename = "Protein_Level")]
  #[strum(serialize = "Protein_Level")]
  ProteinLevel,
  #[serde(rename = "Diet_Category")]
  #[strum(serialize = "Diet_Category")]
  DietCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalAttributes {
  pub carb_level: Option<String>,
  pub protein_level: Option<String>,
  pub diet_category: Option<String>,
}

impl CategoricalAttributes {
  /// Builds attributes, treating blank values as absent.
  #[must_use]
  pub fn new(
    carb_level: Option<String>,
    protein_level: Option<String>,
    diet_category: Option<String>,
  ) -> Self {
    Self {
      carb_level: non_blank(carb_level),
      protein_level: non_blank(protein_level),
      diet_category: non_blank(diet_category),
    }
  }

  #[must_use]
  pub fn get(&self, column: CategoricalColumn) -> Option<&str> {
    match column {
      CategoricalColumn::CarbLevel => self.carb_level.as_deref(),
      CategoricalColumn::ProteinLevel => self.protein_level.as_deref(),
      CategoricalColumn::DietCategory => self.diet_category.as_deref(),
    }
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// A catalog row as loaded, before feature vectors are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodRecord {
  pub name: String,
  pub category: MealCategory,
  pub nutrients: Nutrients,
  pub nutrient_density: f64,
  pub attributes: CategoricalAttributes,
}

impl FoodRecord {
  /// Record whose density is derived from its nutrients.
  #[must_use]
  pub fn new(name: impl Into<String>, category: MealCategory, nutrients: Nutrients) -> Self {
    Self {
      name: name.into(),
      category,
      nutrient_density: nutrients.density(),
      nutrients,
      attributes: CategoricalAttributes::default(),
    }
  }

  /// Overrides the derived density with a precomputed one.
  #[must_use]
  pub fn with_density(mut self, nutrient_density: f64) -> Self {
    self.nutrient_density = nutrient_density;
    self
  }

  #[must_use]
  pub fn with_attributes(mut self, attributes: CategoricalAttributes) -> Self {
    self.attributes = attributes;
    self
  }
}

/// Immutable catalog entry with its precomputed normalized feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItem {
  pub name: String,
  pub category: MealCategory,
  pub nutrients: Nutrients,
  pub nutrient_density: f64,
  pub attributes: CategoricalAttributes,
  features: Vec<f64>,
}

impl FoodItem {
  pub(crate) fn from_record(record: FoodRecord, features: Vec<f64>) -> Self {
    Self {
      name: record.name,
      category: record.category,
      nutrients: record.nutrients,
      nutrient_density: record.nutrient_density,
      attributes: record.attributes,
      features,
    }
  }

  #[must_use]
  pub fn normalized_features(&self) -> &[f64] {
    &self.features
  }
}

/// Per-request nutritional target.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
  pub nutrients: Nutrients,
  pub attributes: CategoricalAttributes,
}

impl UserQuery {
  #[must_use]
  pub fn new(calories: f64, fat: f64, proteins: f64, carbohydrate: f64) -> Self {
    Self {
      nutrients: Nutrients::new(calories, fat, proteins, carbohydrate),
      attributes: CategoricalAttributes::default(),
    }
  }

  #[must_use]
  pub fn with_attributes(mut self, attributes: CategoricalAttributes) -> Self {
    self.attributes = attributes;
    self
  }

  #[must_use]
  pub fn nutrient_density(&self) -> f64 {
    self.nutrients.density()
  }

  /// # Errors
  ///
  /// [`EngineError::InvalidQuery`] if any nutrient is negative or not finite.
  pub fn validate(&self) -> Result<()> {
    match self.nutrients.first_invalid() {
      Some((field, value)) => Err(EngineError::InvalidQuery { field, value }),
      None => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn categories_follow_dataset_codes() {
    for (code, category) in MealCategory::iter().enumerate() {
      assert_eq!(usize::from(category.code()), code);
      assert_eq!(MealCategory::from_code(category.code()), Some(category));
    }
    assert_eq!(MealCategory::from_code(5), None);
  }

  #[test]
  fn lunch_dinner_names() {
    assert_eq!(MealCategory::LunchDinner.to_string(), "Lunch/Dinner");
    assert_eq!(
      MealCategory::from_str("Lunch_Dinner"),
      Ok(MealCategory::LunchDinner)
    );
    assert_eq!(
      serde_json::to_string(&MealCategory::LunchDinner).unwrap(),
      "\"Lunch/Dinner\""
    );
  }

  #[test]
  fn density_formula() {
    let density = nutrient_density(300.0, 20.0, 30.0, 50.0);
    assert!((density - 0.2).abs() < 1e-8);
  }

  #[test]
  fn zero_calories_does_not_divide_by_zero() {
    let density = nutrient_density(0.0, 0.0, 0.0, 0.0);
    assert_eq!(density, 0.0);
    assert!(nutrient_density(0.0, 0.0, 1.0, 0.0).is_finite());
  }

  #[test]
  fn negative_query_is_rejected() {
    let err = UserQuery::new(300.0, -1.0, 30.0, 50.0).validate().unwrap_err();
    assert_eq!(
      err,
      EngineError::InvalidQuery {
        field: "fat",
        value: -1.0
      }
    );
  }

  #[test]
  fn non_finite_query_is_rejected() {
    let err = UserQuery::new(f64::NAN, 0.0, 0.0, 0.0).validate().unwrap_err();
    assert!(matches!(err, EngineError::InvalidQuery { field: "calories", .. }));
  }

  #[test]
  fn blank_attributes_are_absent() {
    let attrs = CategoricalAttributes::new(Some("  ".into()), Some(" High ".into()), None);
    assert_eq!(attrs.get(CategoricalColumn::CarbLevel), None);
    assert_eq!(attrs.get(CategoricalColumn::ProteinLevel), Some("High"));
  }
}
