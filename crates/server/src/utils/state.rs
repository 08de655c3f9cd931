use std::sync::Arc;

use fitai_core::Catalog;

/// Shared, read-only request context. Cloning only bumps the catalog refcount.
#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<Catalog>,
  pub default_top_n: usize,
}

impl AppState {
  #[must_use]
  pub const fn new(catalog: Arc<Catalog>, default_top_n: usize) -> Self {
    Self {
      catalog,
      default_top_n,
    }
  }
}
