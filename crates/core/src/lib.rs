mod error;
pub use error::{EngineError, Result};

mod food;
pub use food::{
  CategoricalAttributes, CategoricalColumn, DENSITY_EPSILON, FoodItem, FoodRecord, MealCategory,
  Nutrients, UserQuery, nutrient_density,
};

mod feature_model;
pub use feature_model::{CategoricalVocabulary, FeatureModel, FeatureRange, NUMERIC_FEATURES};

mod catalog;
pub use catalog::Catalog;

pub mod loader;

mod ranker;
pub use ranker::{CategoryRecommendations, DEFAULT_TOP_N, Recommendation, RecommendationResult, rank};

mod daily_plan;
pub use daily_plan::{DailyPlan, PlanTotals, PlannedMeal, select_optimal_plan};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
