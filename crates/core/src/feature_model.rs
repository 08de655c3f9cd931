use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{CategoricalAttributes, CategoricalColumn, EngineError, Nutrients, Result};

/// Numeric features in the order every vector is laid out.
pub const NUMERIC_FEATURES: [&str; 5] = [
  "calories",
  "fat",
  "proteins",
  "carbohydrate",
  "nutrient_density",
];

/// Fitted min-max bounds of one numeric feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
  pub min: f64,
  pub max: f64,
}

impl FeatureRange {
  #[must_use]
  pub const fn new(min: f64, max: f64) -> Self {
    Self { min, max }
  }

  /// Values outside the fitted range scale linearly past [0, 1].
  /// A degenerate range maps everything to 0.
  #[must_use]
  pub fn scale(&self, value: f64) -> f64 {
    let span = self.max - self.min;
    if span == 0.0 {
      0.0
    } else {
      (value - self.min) / span
    }
  }
}

/// Fitted one-hot vocabulary of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalVocabulary {
  #[serde(alias = "name")]
  pub column: CategoricalColumn,
  pub categories: Vec<String>,
}

impl CategoricalVocabulary {
  /// Unknown or absent values encode as all zeros.
  fn encode_into(&self, value: Option<&str>, out: &mut Vec<f64>) {
    out.extend(
      self
        .categories
        .iter()
        .map(|category| if Some(category.as_str()) == value { 1.0 } else { 0.0 }),
    );
  }
}

/// Immutable fitted scaling and encoding parameters shared by catalog
/// construction and query scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureModel {
  ranges: Vec<FeatureRange>,
  vocabulary: Vec<CategoricalVocabulary>,
}

impl FeatureModel {
  /// # Errors
  ///
  /// [`EngineError::ModelLoad`] if a bound is not finite or `min > max`.
  pub fn new(ranges: Vec<FeatureRange>) -> Result<Self> {
    if let Some((i, range)) = ranges
      .iter()
      .enumerate()
      .find(|(_, r)| !r.min.is_finite() || !r.max.is_finite() || r.min > r.max)
    {
      return Err(EngineError::ModelLoad(format!(
        "feature #{i} has invalid range [{}, {}]",
        range.min, range.max
      )));
    }

    Ok(Self {
      ranges,
      vocabulary: Vec::new(),
    })
  }

  /// # Errors
  ///
  /// [`EngineError::ModelLoad`] if a column is listed twice or has no categories.
  pub fn with_vocabulary(mut self, vocabulary: Vec<CategoricalVocabulary>) -> Result<Self> {
    for (i, vocab) in vocabulary.iter().enumerate() {
      if vocab.categories.is_empty() {
        return Err(EngineError::ModelLoad(format!(
          "categorical column {} has no categories",
          vocab.column
        )));
      }
      if vocabulary[..i].iter().any(|v| v.column == vocab.column) {
        return Err(EngineError::ModelLoad(format!(
          "categorical column {} is listed twice",
          vocab.column
        )));
      }
    }
    self.vocabulary = vocabulary;
    Ok(self)
  }

  #[must_use]
  pub fn numeric_count(&self) -> usize {
    self.ranges.len()
  }

  #[must_use]
  pub fn ranges(&self) -> &[FeatureRange] {
    &self.ranges
  }

  #[must_use]
  pub fn vocabulary(&self) -> &[CategoricalVocabulary] {
    &self.vocabulary
  }

  /// Length of every vector produced by [`FeatureModel::vectorize`].
  #[must_use]
  pub fn dimension(&self) -> usize {
    self.ranges.len()
      + self
        .vocabulary
        .iter()
        .map(|v| v.categories.len())
        .sum::<usize>()
  }

  /// Vector index ranges that take part in scoring a query with `attributes`:
  /// the numeric block plus the one-hot block of every column the query sets.
  /// An absent column means no preference, so its block is left out on both
  /// sides. Adjacent ranges are merged.
  #[must_use]
  pub fn scored_ranges(&self, attributes: &CategoricalAttributes) -> Vec<Range<usize>> {
    let mut ranges = vec![0..self.ranges.len()];
    let mut start = self.ranges.len();
    for vocab in &self.vocabulary {
      let end = start + vocab.categories.len();
      if attributes.get(vocab.column).is_some() {
        match ranges.last_mut() {
          Some(last) if last.end == start => last.end = end,
          _ => ranges.push(start..end),
        }
      }
      start = end;
    }
    ranges
  }

  /// Min-max scales raw numeric features.
  ///
  /// # Errors
  ///
  /// [`EngineError::InvalidFeatureCount`] if `raw` does not have exactly one
  /// value per fitted feature.
  pub fn normalize(&self, raw: &[f64]) -> Result<Vec<f64>> {
    if raw.len() != self.ranges.len() {
      return Err(EngineError::InvalidFeatureCount {
        expected: self.ranges.len(),
        actual: raw.len(),
      });
    }

    Ok(
      raw
        .iter()
        .zip(&self.ranges)
        .map(|(&value, range)| range.scale(value))
        .collect(),
    )
  }

  /// One-hot encoding of every fitted categorical column, in vocabulary order.
  #[must_use]
  pub fn encode(&self, attributes: &CategoricalAttributes) -> Vec<f64> {
    let mut out = Vec::with_capacity(self.dimension() - self.ranges.len());
    for vocab in &self.vocabulary {
      vocab.encode_into(attributes.get(vocab.column), &mut out);
    }
    out
  }

  /// Full feature vector: scaled `[calories, fat, proteins, carbohydrate,
  /// density]` followed by the categorical encoding.
  ///
  /// # Errors
  ///
  /// [`EngineError::InvalidFeatureCount`] if the model was not fitted on the
  /// five numeric features.
  pub fn vectorize(
    &self,
    nutrients: &Nutrients,
    density: f64,
    attributes: &CategoricalAttributes,
  ) -> Result<Vec<f64>> {
    let mut vector = self.normalize(&nutrients.features(density))?;
    vector.extend(self.encode(attributes));
    Ok(vector)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn model() -> FeatureModel {
    FeatureModel::new(vec![
      FeatureRange::new(0.0, 1000.0),
      FeatureRange::new(0.0, 100.0),
      FeatureRange::new(0.0, 100.0),
      FeatureRange::new(0.0, 200.0),
      FeatureRange::new(-1.0, 3.0),
    ])
    .unwrap()
  }

  #[test]
  fn scales_into_fitted_range() {
    let scaled = model().normalize(&[300.0, 20.0, 30.0, 50.0, 0.2]).unwrap();
    let expected = [0.3, 0.2, 0.3, 0.25, 0.3];
    for (got, want) in scaled.iter().zip(expected) {
      assert!((got - want).abs() < 1e-12, "{got} != {want}");
    }
  }

  #[test]
  fn out_of_range_values_are_not_clamped() {
    let scaled = model().normalize(&[2000.0, 0.0, 0.0, 0.0, -3.0]).unwrap();
    assert!((scaled[0] - 2.0).abs() < 1e-12);
    assert!((scaled[4] + 0.5).abs() < 1e-12);
  }

  #[test]
  fn degenerate_range_scales_to_zero() {
    let model = FeatureModel::new(vec![FeatureRange::new(5.0, 5.0)]).unwrap();
    assert_eq!(model.normalize(&[42.0]).unwrap(), vec![0.0]);
  }

  #[test]
  fn mismatched_feature_count_is_rejected() {
    let err = model().normalize(&[300.0, 20.0, 30.0, 50.0]).unwrap_err();
    assert_eq!(
      err,
      EngineError::InvalidFeatureCount {
        expected: 5,
        actual: 4
      }
    );

    let err = model().normalize(&[0.0; 6]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidFeatureCount { actual: 6, .. }));
  }

  #[test]
  fn inverted_range_is_rejected() {
    let err = FeatureModel::new(vec![FeatureRange::new(2.0, 1.0)]).unwrap_err();
    assert!(matches!(err, EngineError::ModelLoad(_)));
  }

  #[test]
  fn one_hot_ignores_unknown_values() {
    let model = model()
      .with_vocabulary(vec![
        CategoricalVocabulary {
          column: CategoricalColumn::CarbLevel,
          categories: vec!["High".into(), "Low".into(), "Moderate".into()],
        },
        CategoricalVocabulary {
          column: CategoricalColumn::DietCategory,
          categories: vec!["Keto".into(), "Vegan".into()],
        },
      ])
      .unwrap();
    assert_eq!(model.dimension(), 10);

    let attrs = CategoricalAttributes::new(Some("Low".into()), None, Some("Paleo".into()));
    assert_eq!(model.encode(&attrs), vec![0.0, 1.0, 0.0, 0.0, 0.0]);

    let vector = model
      .vectorize(&Nutrients::new(300.0, 20.0, 30.0, 50.0), 0.2, &attrs)
      .unwrap();
    assert_eq!(vector.len(), 10);
    assert_eq!(&vector[5..], &[0.0, 1.0, 0.0, 0.0, 0.0]);
  }

  #[test]
  fn scored_ranges_skip_absent_columns() {
    let model = model()
      .with_vocabulary(vec![
        CategoricalVocabulary {
          column: CategoricalColumn::CarbLevel,
          categories: vec!["High".into(), "Low".into(), "Moderate".into()],
        },
        CategoricalVocabulary {
          column: CategoricalColumn::ProteinLevel,
          categories: vec!["High".into(), "Low".into()],
        },
        CategoricalVocabulary {
          column: CategoricalColumn::DietCategory,
          categories: vec!["Keto".into(), "Vegan".into()],
        },
      ])
      .unwrap();

    let none = CategoricalAttributes::default();
    assert_eq!(model.scored_ranges(&none), vec![0..5]);

    let carb = CategoricalAttributes::new(Some("Low".into()), None, None);
    assert_eq!(model.scored_ranges(&carb), vec![0..8]);

    let diet = CategoricalAttributes::new(None, None, Some("Paleo".into()));
    assert_eq!(model.scored_ranges(&diet), vec![0..5, 10..12]);

    let all = CategoricalAttributes::new(
      Some("High".into()),
      Some("Low".into()),
      Some("Keto".into()),
    );
    assert_eq!(model.scored_ranges(&all), vec![0..model.dimension()]);
  }

  #[test]
  fn duplicate_vocabulary_column_is_rejected() {
    let vocab = CategoricalVocabulary {
      column: CategoricalColumn::ProteinLevel,
      categories: vec!["High".into()],
    };
    let err = model()
      .with_vocabulary(vec![vocab.clone(), vocab])
      .unwrap_err();
    assert!(matches!(err, EngineError::ModelLoad(_)));
  }

  #[test]
  fn vectorize_requires_five_numeric_features() {
    let model = FeatureModel::new(vec![FeatureRange::new(0.0, 1.0); 4]).unwrap();
    let err = model
      .vectorize(
        &Nutrients::new(1.0, 1.0, 1.0, 1.0),
        0.0,
        &CategoricalAttributes::default(),
      )
      .unwrap_err();
    assert!(matches!(
      err,
      EngineError::InvalidFeatureCount {
        expected: 4,
        actual: 5
      }
    ));
  }
}
