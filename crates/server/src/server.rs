use axum::{Router, response::Html, routing::get};
use fitai_shared::AppError;
use tokio::net::TcpListener;

use crate::{
  api,
  utils::{AppState, shutdown_signal},
};

#[axum::debug_handler]
async fn handler() -> Html<&'static str> {
  Html("<h1>FIT AI</h1>")
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(handler))
    .merge(api::app())
    .with_state(state)
}

pub async fn server(state: AppState, addr: &str) -> Result<(), AppError> {
  let app = router(state);

  let listener = TcpListener::bind(addr).await?;

  tracing::info!("server started at http://{addr}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  tracing::info!("server stopped");

  Ok(())
}
