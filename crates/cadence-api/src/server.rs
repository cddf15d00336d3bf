use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use cadence_status::StatusService;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes::status_routes;

const API_PREFIX: &str = "/api/v3";

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind: SocketAddr,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
  #[error("failed to bind to {addr}: {source}")]
  Bind {
    addr: SocketAddr,
    #[source]
    source: std::io::Error,
  },

  #[error("server error: {0}")]
  Serve(#[source] std::io::Error),
}

async fn health() -> &'static str {
  "ok"
}

/// Build the router with all routes and middleware.
pub fn router(service: StatusService) -> Router {
  Router::new()
    .route("/health", get(health))
    .nest(API_PREFIX, status_routes())
    .layer(TraceLayer::new_for_http())
    .with_state(service)
}

/// Serve the API until `cancel` is triggered.
pub async fn serve(
  config: ServerConfig,
  service: StatusService,
  cancel: CancellationToken,
) -> Result<(), ServerError> {
  let listener = TcpListener::bind(config.bind)
    .await
    .map_err(|source| ServerError::Bind {
      addr: config.bind,
      source,
    })?;

  info!(addr = %config.bind, "status api listening");

  axum::serve(listener, router(service))
    .with_graceful_shutdown(cancel.cancelled_owned())
    .await
    .map_err(ServerError::Serve)?;

  info!("status api stopped");
  Ok(())
}
