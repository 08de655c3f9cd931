use tokio::signal;

/// Resolves on Ctrl+C, or SIGTERM on unix.
///
/// # Panics
///
/// Panics if a signal handler fails to install.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c()
      .await
      .expect("failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("failed to install signal handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  let signal_name = tokio::select! {
    () = ctrl_c => "ctrl-c",
    () = terminate => "terminate",
  };

  tracing::info!(signal = signal_name, "shutdown signal received, draining connections");
}
