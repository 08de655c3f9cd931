use std::sync::Arc;

use anyhow::Context;
use fitai_core::loader::{load_catalog, load_feature_model};
use fitai_server::{server, utils::AppState};
use fitai_shared::{APP_ENV, AppError};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
  // `.env` is optional; real environment variables take precedence.
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{}=debug,fitai_server=debug", env!("CARGO_CRATE_NAME")).into()
      }),
    )
    .with(tracing_subscriber::fmt::layer())
    .with(ErrorLayer::default())
    .init();

  let env = &*APP_ENV;

  let model = load_feature_model(&env.model_path).with_context(|| {
    format!(
      "fitai: cannot load feature model from {}",
      env.model_path.display()
    )
  })?;
  tracing::info!(
    path = %env.model_path.display(),
    dimension = model.dimension(),
    categorical_columns = model.vocabulary().len(),
    "feature model loaded"
  );

  let catalog = load_catalog(&env.catalog_path, Arc::new(model)).with_context(|| {
    format!(
      "fitai: cannot load catalog from {}",
      env.catalog_path.display()
    )
  })?;
  for category in catalog.all_categories() {
    let items = catalog.items_by_category(category).len();
    if items == 0 {
      tracing::warn!(%category, "catalog has no items for category");
    } else {
      tracing::info!(%category, items, "catalog group loaded");
    }
  }

  let state = AppState::new(Arc::new(catalog), env.default_top_n);
  server(state, &env.bind_addr).await
}
