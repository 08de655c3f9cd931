use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_CATALOG_PATH: &str = "data/foods.csv";
const DEFAULT_MODEL_PATH: &str = "data/feature_model.json";
const DEFAULT_TOP_N: usize = 5;

pub struct AppEnv {
  pub bind_addr: String,
  pub catalog_path: PathBuf,
  pub model_path: PathBuf,
  pub default_top_n: usize,
}

impl AppEnv {
  fn new() -> Self {
    Self {
      bind_addr: env::var("FITAI_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned()),
      catalog_path: env::var("FITAI_CATALOG_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH), PathBuf::from),
      model_path: env::var("FITAI_MODEL_PATH")
        .map_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH), PathBuf::from),
      default_top_n: parse_or("FITAI_DEFAULT_TOP_N", DEFAULT_TOP_N),
    }
  }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
  env::var(key)
    .ok()
    .and_then(|raw| raw.trim().parse().ok())
    .unwrap_or(default)
}

pub static APP_ENV: LazyLock<AppEnv> = LazyLock::new(AppEnv::new);
