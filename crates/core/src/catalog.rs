use std::{ops::Range, sync::Arc};

use strum::{EnumCount, IntoEnumIterator};

use crate::{EngineError, FeatureModel, FoodItem, FoodRecord, MealCategory, Result};

/// Immutable, category-indexed food table.
///
/// Items are stored grouped by category; within a group they keep the order
/// they were loaded in, which is the tie-break order for every ranking.
#[derive(Debug, Clone)]
pub struct Catalog {
  items: Vec<FoodItem>,
  groups: [Range<usize>; MealCategory::COUNT],
  model: Arc<FeatureModel>,
}

impl Catalog {
  /// Attaches a normalized feature vector from `model` to every record.
  ///
  /// # Errors
  ///
  /// - [`EngineError::CatalogLoad`] if a record has an invalid nutrient value.
  /// - [`EngineError::InvalidFeatureCount`] if `model` was not fitted on the
  ///   numeric food features.
  pub fn build(records: Vec<FoodRecord>, model: Arc<FeatureModel>) -> Result<Self> {
    let mut items = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
      if let Some((field, value)) = record.nutrients.first_invalid() {
        return Err(EngineError::CatalogLoad(format!(
          "item #{} ({}): `{field}` must be a finite, non-negative number (got {value})",
          row + 1,
          record.name
        )));
      }
      if !record.nutrient_density.is_finite() {
        return Err(EngineError::CatalogLoad(format!(
          "item #{} ({}): nutrient density is not finite",
          row + 1,
          record.name
        )));
      }

      let features = model.vectorize(
        &record.nutrients,
        record.nutrient_density,
        &record.attributes,
      )?;
      items.push(FoodItem::from_record(record, features));
    }

    // Stable: load order survives inside each category.
    items.sort_by_key(|item| item.category);

    let mut groups: [Range<usize>; MealCategory::COUNT] = Default::default();
    let mut start = 0;
    for category in MealCategory::iter() {
      let len = items[start..]
        .iter()
        .take_while(|item| item.category == category)
        .count();
      groups[category.index()] = start..start + len;
      start += len;
    }

    Ok(Self {
      items,
      groups,
      model,
    })
  }

  /// Items of one category in load order.
  #[must_use]
  pub fn items_by_category(&self, category: MealCategory) -> &[FoodItem] {
    &self.items[self.groups[category.index()].clone()]
  }

  /// The fixed category enumeration, in grouping order.
  pub fn all_categories(&self) -> impl Iterator<Item = MealCategory> + use<> {
    MealCategory::iter()
  }

  /// The model every item vector was built with.
  #[must_use]
  pub fn feature_model(&self) -> &FeatureModel {
    &self.model
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.items.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Nutrients, testing};

  #[test]
  fn groups_keep_load_order() {
    let records = vec![
      FoodRecord::new("toast", MealCategory::Breakfast, Nutrients::new(120.0, 2.0, 4.0, 20.0)),
      FoodRecord::new("cola", MealCategory::Drink, Nutrients::new(140.0, 0.0, 0.0, 39.0)),
      FoodRecord::new("eggs", MealCategory::Breakfast, Nutrients::new(150.0, 10.0, 12.0, 1.0)),
      FoodRecord::new("juice", MealCategory::Drink, Nutrients::new(110.0, 0.0, 2.0, 26.0)),
      FoodRecord::new("bagel", MealCategory::Breakfast, Nutrients::new(250.0, 1.5, 10.0, 48.0)),
    ];
    let catalog = Catalog::build(records, Arc::new(testing::fixture_model())).unwrap();

    let names = |category| {
      catalog
        .items_by_category(category)
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
    };
    assert_eq!(names(MealCategory::Breakfast), ["toast", "eggs", "bagel"]);
    assert_eq!(names(MealCategory::Drink), ["cola", "juice"]);
    assert!(catalog.items_by_category(MealCategory::Snack).is_empty());
    assert_eq!(catalog.len(), 5);
  }

  #[test]
  fn all_categories_enumerates_fixed_order() {
    let catalog = testing::fixture_catalog();
    let categories = catalog.all_categories().collect::<Vec<_>>();
    assert_eq!(
      categories,
      [
        MealCategory::Breakfast,
        MealCategory::Carbs,
        MealCategory::Drink,
        MealCategory::LunchDinner,
        MealCategory::Snack,
      ]
    );
  }

  #[test]
  fn item_vectors_use_the_catalog_model() {
    let catalog = testing::fixture_catalog();
    for item in catalog.items_by_category(MealCategory::Snack) {
      let expected = catalog
        .feature_model()
        .vectorize(&item.nutrients, item.nutrient_density, &item.attributes)
        .unwrap();
      assert_eq!(item.normalized_features(), expected.as_slice());
    }
  }

  #[test]
  fn negative_nutrient_fails_catalog_load() {
    let records = vec![FoodRecord::new(
      "broken",
      MealCategory::Snack,
      Nutrients::new(100.0, -1.0, 0.0, 0.0),
    )];
    let err = Catalog::build(records, Arc::new(testing::fixture_model())).unwrap_err();
    assert!(matches!(err, EngineError::CatalogLoad(msg) if msg.contains("fat")));
  }

  #[test]
  fn model_shape_mismatch_is_reported() {
    let model = FeatureModel::new(vec![crate::FeatureRange::new(0.0, 1.0); 3]).unwrap();
    let records = vec![FoodRecord::new(
      "apple",
      MealCategory::Snack,
      Nutrients::new(95.0, 0.3, 0.5, 25.0),
    )];
    let err = Catalog::build(records, Arc::new(model)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidFeatureCount { expected: 3, actual: 5 }));
  }
}
