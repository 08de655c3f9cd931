use axum::{Json, extract::State};
use fitai_core::{MealCategory, PlanTotals, select_optimal_plan};
use fitai_shared::AppError;
use serde::Serialize;
use utoipa::ToSchema;

use super::{FoodView, engine_error};
use crate::utils::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PlannedFood {
  #[serde(rename = "type")]
  pub category: MealCategory,
  pub food: FoodView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailySummary {
  pub total_calories: f64,
  pub total_fat: f64,
  pub total_proteins: f64,
  pub total_carbs: f64,
  pub average_nutrient_density: f64,
}

impl From<PlanTotals> for DailySummary {
  fn from(totals: PlanTotals) -> Self {
    Self {
      total_calories: totals.total_calories,
      total_fat: totals.total_fat,
      total_proteins: totals.total_proteins,
      total_carbs: totals.total_carbs,
      average_nutrient_density: totals.average_nutrient_density,
    }
  }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyMealResponse {
  pub status: String,
  /// One item per meal category
  pub data: Vec<PlannedFood>,
  pub summary: DailySummary,
}

/// Highest nutrient-density food of every meal category
#[utoipa::path(
  get,
  path = "/api/v1/dailyMeal",
  responses(
    (status = 200, description = "Optimal daily meal plan", body = DailyMealResponse),
    (status = 500, description = "A meal category has no catalog items")
  )
)]
#[axum::debug_handler]
pub async fn daily_meal(State(state): State<AppState>) -> Result<Json<DailyMealResponse>, AppError> {
  let plan = select_optimal_plan(&state.catalog).map_err(engine_error)?;

  tracing::debug!(
    meals = plan.meals.len(),
    total_calories = plan.totals.total_calories,
    "selected daily plan"
  );

  let data = plan
    .meals
    .iter()
    .map(|meal| PlannedFood {
      category: meal.category,
      food: FoodView::from(meal.item),
    })
    .collect();

  Ok(Json(DailyMealResponse {
    status: "success".to_owned(),
    data,
    summary: plan.totals.into(),
  }))
}
