use crate::{Catalog, EngineError, FoodItem, MealCategory, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedMeal<'a> {
  pub category: MealCategory,
  pub item: &'a FoodItem,
}

/// Aggregates over the selected meals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanTotals {
  pub total_calories: f64,
  pub total_fat: f64,
  pub total_proteins: f64,
  pub total_carbs: f64,
  pub average_nutrient_density: f64,
}

impl PlanTotals {
  fn over(meals: &[PlannedMeal<'_>]) -> Self {
    let mut totals = meals.iter().fold(Self::default(), |mut acc, meal| {
      let n = &meal.item.nutrients;
      acc.total_calories += n.calories;
      acc.total_fat += n.fat;
      acc.total_proteins += n.proteins;
      acc.total_carbs += n.carbohydrate;
      acc.average_nutrient_density += meal.item.nutrient_density;
      acc
    });
    if !meals.is_empty() {
      #[allow(clippy::cast_precision_loss)]
      let count = meals.len() as f64;
      totals.average_nutrient_density /= count;
    }
    totals
  }
}

/// One highest-density item per category.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan<'a> {
  pub meals: Vec<PlannedMeal<'a>>,
  pub totals: PlanTotals,
}

impl<'a> DailyPlan<'a> {
  #[must_use]
  pub fn meal(&self, category: MealCategory) -> Option<&'a FoodItem> {
    self
      .meals
      .iter()
      .find(|m| m.category == category)
      .map(|m| m.item)
  }
}

/// Pick the item with the highest nutrient density in every category; the
/// earliest loaded item wins a tie.
///
/// # Errors
///
/// [`EngineError::EmptyCategory`] if any category has no items.
pub fn select_optimal_plan(catalog: &Catalog) -> Result<DailyPlan<'_>> {
  let meals = catalog
    .all_categories()
    .map(|category| {
      catalog
        .items_by_category(category)
        .iter()
        .reduce(|best, item| {
          if item.nutrient_density > best.nutrient_density {
            item
          } else {
            best
          }
        })
        .map(|item| PlannedMeal { category, item })
        .ok_or(EngineError::EmptyCategory(category))
    })
    .collect::<Result<Vec<_>>>()?;

  let totals = PlanTotals::over(&meals);
  Ok(DailyPlan { meals, totals })
}
