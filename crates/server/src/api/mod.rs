use axum::{
  Json, Router,
  routing::{get, post},
};
use fitai_core::EngineError;
use fitai_shared::AppError;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::utils::AppState;

mod daily_meal;
mod food;
mod recommendations;

pub use daily_meal::{DailyMealResponse, DailySummary, PlannedFood};
pub use food::FoodView;
pub use recommendations::{GetRecommendations, RecommendationsResponse, RecommendedFood};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "FIT AI API",
    version = "0.0.1",
    description = "Food recommendations for a nutritional target"
  ),
  paths(
    recommendations::recommendations,
    daily_meal::daily_meal
  ),
  components(schemas(
    GetRecommendations,
    RecommendationsResponse,
    RecommendedFood,
    DailyMealResponse,
    DailySummary,
    PlannedFood,
    FoodView,
    fitai_core::MealCategory,
  ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

/// Query mistakes are the caller's to fix; anything else means the loaded
/// catalog is inconsistent.
fn engine_error(err: EngineError) -> AppError {
  if err.is_client_error() {
    tracing::debug!(error = %err, "rejected request");
    AppError::bad_request(err)
  } else {
    tracing::error!(error = %err, "engine failure");
    AppError::new(err)
  }
}

pub fn app() -> Router<AppState> {
  Router::new()
    .route(
      "/api/v1/recommendations",
      post(recommendations::recommendations),
    )
    .route("/api/v1/dailyMeal", get(daily_meal::daily_meal))
    .route("/openapi.json", get(openapi_json))
    .merge(Scalar::with_url("/openapi/", ApiDoc::openapi()))
}
