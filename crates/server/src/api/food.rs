use fitai_core::FoodItem;
use serde::Serialize;
use utoipa::ToSchema;

/// A catalog item as shown to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct FoodView {
  pub name: String,
  /// kcal
  pub calories: f64,
  /// grams
  pub fat: f64,
  /// grams
  pub proteins: f64,
  /// Carbohydrate, in grams
  pub carbo: f64,
  pub nutrient_density: f64,
}

impl From<&FoodItem> for FoodView {
  fn from(item: &FoodItem) -> Self {
    Self {
      name: item.name.clone(),
      calories: item.nutrients.calories,
      fat: item.nutrients.fat,
      proteins: item.nutrients.proteins,
      carbo: item.nutrients.carbohydrate,
      nutrient_density: item.nutrient_density,
    }
  }
}
