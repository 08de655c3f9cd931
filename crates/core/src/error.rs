use thiserror::Error;

use crate::MealCategory;

/// Failures surfaced by the recommendation engine.
///
/// Startup failures ([`EngineError::CatalogLoad`], [`EngineError::ModelLoad`])
/// are fatal to initialization; query failures only affect their own request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
  #[error("invalid query: `{field}` must be a finite, non-negative number (got {value})")]
  InvalidQuery { field: &'static str, value: f64 },

  #[error("feature count mismatch: model is fitted on {expected} features, got {actual}")]
  InvalidFeatureCount { expected: usize, actual: usize },

  #[error("catalog load failed: {0}")]
  CatalogLoad(String),

  #[error("feature model load failed: {0}")]
  ModelLoad(String),

  #[error("catalog has no items for category {0}")]
  EmptyCategory(MealCategory),
}

impl EngineError {
  /// Whether the caller caused the failure and can fix it by changing the input.
  #[must_use]
  pub const fn is_client_error(&self) -> bool {
    matches!(
      self,
      Self::InvalidQuery { .. } | Self::InvalidFeatureCount { .. }
    )
  }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
