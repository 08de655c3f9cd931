use axum::{Json, extract::State};
use chrono::{NaiveDate, Utc};
use fitai_core::{CategoricalAttributes, MealCategory, UserQuery, rank};
use fitai_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{FoodView, engine_error};
use crate::utils::AppState;

const MAX_TOP_N: usize = 50;

fn sanitize_top_n(value: usize) -> usize {
  value.clamp(1, MAX_TOP_N)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GetRecommendations {
  /// Target energy in kcal
  pub calories: f64,
  /// Target fat in grams
  pub fat: f64,
  /// Target protein in grams
  pub proteins: f64,
  /// Target carbohydrate in grams
  pub carbohydrate: f64,
  /// Items per category (1-50). Defaults to the server setting.
  pub top_n: Option<usize>,
  #[serde(default, alias = "Carb_Level")]
  pub carb_level: Option<String>,
  #[serde(default, alias = "Protein_Level")]
  pub protein_level: Option<String>,
  #[serde(default, alias = "Diet_Category")]
  pub diet_category: Option<String>,
}

impl GetRecommendations {
  fn to_query(&self) -> UserQuery {
    UserQuery::new(self.calories, self.fat, self.proteins, self.carbohydrate).with_attributes(
      CategoricalAttributes::new(
        self.carb_level.clone(),
        self.protein_level.clone(),
        self.diet_category.clone(),
      ),
    )
  }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendedFood {
  #[serde(rename = "type")]
  pub category: MealCategory,
  /// Cosine similarity to the target, in [-1, 1]
  pub score: f64,
  pub food: FoodView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
  #[serde(rename = "UserID")]
  pub user_id: Uuid,
  pub date: NaiveDate,
  pub status: String,
  /// Grouped by category, best match first within each group
  pub data: Vec<RecommendedFood>,
}

/// Rank catalog foods against a nutritional target
#[utoipa::path(
  post,
  path = "/api/v1/recommendations",
  request_body = GetRecommendations,
  responses(
    (status = 200, description = "Top matches per meal category", body = RecommendationsResponse),
    (status = 400, description = "Negative or non-finite nutrient value")
  )
)]
#[axum::debug_handler]
pub async fn recommendations(
  State(state): State<AppState>,
  Json(payload): Json<GetRecommendations>,
) -> Result<Json<RecommendationsResponse>, AppError> {
  let top_n = sanitize_top_n(payload.top_n.unwrap_or(state.default_top_n));

  let result = rank(&state.catalog, &payload.to_query(), top_n).map_err(engine_error)?;

  tracing::debug!(
    top_n,
    groups = result.groups.len(),
    items = result.len(),
    "ranked recommendations"
  );

  let data = result
    .iter()
    .map(|rec| RecommendedFood {
      category: rec.category,
      score: rec.score,
      food: FoodView::from(rec.item),
    })
    .collect();

  Ok(Json(RecommendationsResponse {
    user_id: Uuid::new_v4(),
    date: Utc::now().date_naive(),
    status: "success".to_owned(),
    data,
  }))
}
