use std::{borrow::Cow, cmp::Ordering, ops::Range};

use fitai_shared::similarity::cosine_similarity;

use crate::{Catalog, FoodItem, MealCategory, Result, UserQuery};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
  pub category: MealCategory,
  pub item: &'a FoodItem,
  /// Cosine similarity to the query, in [-1, 1].
  pub score: f64,
}

/// Top-scoring items of one category, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecommendations<'a> {
  pub category: MealCategory,
  pub items: Vec<Recommendation<'a>>,
}

/// Ranked items grouped by category in enumeration order.
///
/// Categories without catalog items have no group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationResult<'a> {
  pub groups: Vec<CategoryRecommendations<'a>>,
}

impl<'a> RecommendationResult<'a> {
  #[must_use]
  pub fn group(&self, category: MealCategory) -> Option<&CategoryRecommendations<'a>> {
    self.groups.iter().find(|g| g.category == category)
  }

  /// All recommendations flattened, group by group.
  pub fn iter(&self) -> impl Iterator<Item = &Recommendation<'a>> {
    self.groups.iter().flat_map(|g| g.items.iter())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.groups.iter().map(|g| g.items.len()).sum()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// The parts of `vector` covered by `ranges`, borrowed when contiguous.
fn project<'v>(vector: &'v [f64], ranges: &[Range<usize>]) -> Cow<'v, [f64]> {
  match ranges {
    [only] => Cow::Borrowed(&vector[only.clone()]),
    _ => Cow::Owned(
      ranges
        .iter()
        .flat_map(|r| vector[r.clone()].iter().copied())
        .collect(),
    ),
  }
}

/// Rank every category of `catalog` against `query`, keeping the `top_n` most
/// similar items of each.
///
/// One-hot columns the query leaves unset are ignored on both sides. Exact
/// score ties keep catalog load order.
///
/// # Errors
///
/// - [`crate::EngineError::InvalidQuery`] if a nutrient is negative.
/// - [`crate::EngineError::InvalidFeatureCount`] if the query vector does not
///   fit the catalog's feature model.
pub fn rank<'a>(
  catalog: &'a Catalog,
  query: &UserQuery,
  top_n: usize,
) -> Result<RecommendationResult<'a>> {
  query.validate()?;

  let model = catalog.feature_model();
  let full_vector = model.vectorize(
    &query.nutrients,
    query.nutrient_density(),
    &query.attributes,
  )?;
  let scored_ranges = model.scored_ranges(&query.attributes);
  let user_vector = project(&full_vector, &scored_ranges);

  let groups = catalog
    .all_categories()
    .filter_map(|category| {
      let items = catalog.items_by_category(category);
      if items.is_empty() {
        return None;
      }

      let mut scored = items
        .iter()
        .map(|item| Recommendation {
          category,
          item,
          score: cosine_similarity(
            &user_vector,
            &project(item.normalized_features(), &scored_ranges),
          ),
        })
        .collect::<Vec<_>>();

      // `sort_by` is stable; scores are never NaN.
      scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
      scored.truncate(top_n);

      Some(CategoryRecommendations {
        category,
        items: scored,
      })
    })
    .collect();

  Ok(RecommendationResult { groups })
}
