//! HTTP API over the loaded release data.
//!
//! ```text
//! GET  /api/health
//! GET  /api/releases/data      ?repository=&dateFrom=&dateTo=&isPrerelease=&timeSlot=
//! GET  /api/releases/stats
//! POST /api/releases/refresh
//! ```
//!
//! Every body is wrapped in [`ApiResponse`].

mod error;
mod response;
mod routes;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::runtime::Runtime;
use crate::service::DataService;

pub use error::AppError;
pub use response::ApiResponse;
pub use routes::HealthStatus;

use routes::{
    data_handler, health_handler, not_found_handler, refresh_handler, stats_handler,
};

/// CORS policy for the dashboard origin. `*` allows any origin, without
/// credentials.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("Invalid CORS origin: {}", origin))?;
    Ok(layer.allow_origin(origin).allow_credentials(true))
}

pub fn router<R: Runtime + 'static>(service: Arc<DataService<R>>, cors: CorsLayer) -> Router {
    let releases = Router::new()
        .route("/data", get(data_handler::<R>))
        .route("/stats", get(stats_handler::<R>))
        .route("/refresh", post(refresh_handler::<R>));

    Router::new()
        .route("/api/health", get(health_handler))
        .nest("/api/releases", releases)
        .fallback(not_found_handler)
        .layer(cors)
        .with_state(service)
}

/// Bind, serve until Ctrl+C or SIGTERM, then drain.
pub async fn start_server<R: Runtime + 'static>(
    config: &ServerConfig,
    service: Arc<DataService<R>>,
) -> Result<()> {
    let app = router(service, cors_layer(&config.cors_origin)?);

    let address = config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server running on http://{address}");
    info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
