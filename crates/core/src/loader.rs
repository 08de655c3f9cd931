//! Readers for the two startup artifacts: the fitted Feature Model (JSON) and
//! the food table (CSV).

use std::{fs::File, io::Read, path::Path, str::FromStr, sync::Arc};

use serde::Deserialize;

use crate::{
  CategoricalAttributes, CategoricalVocabulary, Catalog, EngineError, FeatureModel, FeatureRange,
  FoodRecord, MealCategory, NUMERIC_FEATURES, Nutrients, Result,
};

const REQUIRED_COLUMNS: [&str; 6] = [
  "name",
  "calories",
  "fat",
  "proteins",
  "carbohydrate",
  "Meal Type",
];

#[derive(Debug, Deserialize)]
struct NamedRange {
  name: String,
  min: f64,
  max: f64,
}

#[derive(Debug, Deserialize)]
struct FeatureModelArtifact {
  numeric: Vec<NamedRange>,
  #[serde(default)]
  categorical: Vec<CategoricalVocabulary>,
}

impl TryFrom<FeatureModelArtifact> for FeatureModel {
  type Error = EngineError;

  fn try_from(artifact: FeatureModelArtifact) -> Result<Self> {
    let names = artifact
      .numeric
      .iter()
      .map(|r| r.name.as_str())
      .collect::<Vec<_>>();
    if names != NUMERIC_FEATURES {
      return Err(EngineError::ModelLoad(format!(
        "numeric features must be {NUMERIC_FEATURES:?} in order, found {names:?}"
      )));
    }

    let ranges = artifact
      .numeric
      .iter()
      .map(|r| FeatureRange::new(r.min, r.max))
      .collect();
    Self::new(ranges)?.with_vocabulary(artifact.categorical)
  }
}

/// # Errors
///
/// [`EngineError::ModelLoad`] if the document is malformed or does not list
/// the numeric features in model order.
pub fn read_feature_model<R: Read>(reader: R) -> Result<FeatureModel> {
  let artifact: FeatureModelArtifact =
    serde_json::from_reader(reader).map_err(|err| EngineError::ModelLoad(err.to_string()))?;
  FeatureModel::try_from(artifact)
}

/// # Errors
///
/// [`EngineError::ModelLoad`] if the file cannot be opened or parsed.
pub fn load_feature_model(path: impl AsRef<Path>) -> Result<FeatureModel> {
  let path = path.as_ref();
  let file = File::open(path)
    .map_err(|err| EngineError::ModelLoad(format!("{}: {err}", path.display())))?;
  read_feature_model(file)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
  name: String,
  calories: f64,
  fat: f64,
  proteins: f64,
  carbohydrate: f64,
  #[serde(rename = "Meal Type")]
  meal_type: String,
  #[serde(rename = "Nutrient_Density", default)]
  nutrient_density: Option<f64>,
  #[serde(rename = "Carb_Level", default)]
  carb_level: Option<String>,
  #[serde(rename = "Protein_Level", default)]
  protein_level: Option<String>,
  #[serde(rename = "Diet_Category", default)]
  diet_category: Option<String>,
}

/// Accepts the dataset's integer code (`3`, `3.0`) or a display name.
fn parse_meal_type(raw: &str) -> Option<MealCategory> {
  let raw = raw.trim();
  if let Ok(code) = raw.parse::<u8>() {
    return MealCategory::from_code(code);
  }
  if let Ok(code) = raw.parse::<f64>() {
    return (code.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&code))
      .then(|| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let code = code as u8;
        MealCategory::from_code(code)
      })
      .flatten();
  }
  MealCategory::from_str(raw).ok()
}

impl CatalogRow {
  fn into_record(self, row: usize) -> Result<FoodRecord> {
    let category = parse_meal_type(&self.meal_type).ok_or_else(|| {
      EngineError::CatalogLoad(format!(
        "row {row}: unrecognized meal type `{}`",
        self.meal_type
      ))
    })?;

    let nutrients = Nutrients::new(self.calories, self.fat, self.proteins, self.carbohydrate);
    if let Some((field, value)) = nutrients.first_invalid() {
      return Err(EngineError::CatalogLoad(format!(
        "row {row}: `{field}` must be a finite, non-negative number (got {value})"
      )));
    }

    let record = FoodRecord::new(self.name, category, nutrients).with_attributes(
      CategoricalAttributes::new(self.carb_level, self.protein_level, self.diet_category),
    );
    Ok(match self.nutrient_density {
      Some(density) if density.is_finite() => record.with_density(density),
      Some(density) => {
        return Err(EngineError::CatalogLoad(format!(
          "row {row}: nutrient density {density} is not finite"
        )));
      }
      None => record,
    })
  }
}

/// Parse the food table. Rows keep file order.
///
/// # Errors
///
/// [`EngineError::CatalogLoad`] if a required column is missing, a value does
/// not parse, a nutrient is negative, or a meal type is unrecognized.
pub fn read_catalog_records<R: Read>(reader: R) -> Result<Vec<FoodRecord>> {
  let mut reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(reader);

  let headers = reader
    .headers()
    .map_err(|err| EngineError::CatalogLoad(err.to_string()))?;
  if let Some(missing) = REQUIRED_COLUMNS
    .iter()
    .find(|column| !headers.iter().any(|h| h == **column))
  {
    return Err(EngineError::CatalogLoad(format!(
      "missing required column `{missing}`"
    )));
  }

  reader
    .deserialize::<CatalogRow>()
    .enumerate()
    .map(|(i, row)| {
      let row_number = i + 1;
      row
        .map_err(|err| EngineError::CatalogLoad(format!("row {row_number}: {err}")))?
        .into_record(row_number)
    })
    .collect()
}

/// # Errors
///
/// [`EngineError::CatalogLoad`] if the file cannot be opened or parsed.
pub fn load_catalog_records(path: impl AsRef<Path>) -> Result<Vec<FoodRecord>> {
  let path = path.as_ref();
  let file = File::open(path)
    .map_err(|err| EngineError::CatalogLoad(format!("{}: {err}", path.display())))?;
  read_catalog_records(file)
}

/// Load the food table and build the catalog against `model`.
///
/// # Errors
///
/// See [`load_catalog_records`] and [`Catalog::build`].
pub fn load_catalog(path: impl AsRef<Path>, model: Arc<FeatureModel>) -> Result<Catalog> {
  Catalog::build(load_catalog_records(path)?, model)
}
