use tokio::signal;

/// Resolves on Ctrl+C or SIGTERM so in-flight requests can finish.
///
/// A handler that fails to install is logged and never fires; the other one
/// still triggers shutdown.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = signal::ctrl_c().await {
      tracing::error!("failed to listen for Ctrl+C: {err}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(err) => {
        tracing::error!("failed to install SIGTERM handler: {err}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
    () = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}
