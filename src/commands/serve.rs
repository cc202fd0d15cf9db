use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

use crate::{
    config::ServerConfig,
    runtime::Runtime,
    server::start_server,
    service::DataService,
};

/// Load the release CSV, then serve it until shutdown.
///
/// Fails without binding when the initial load fails.
#[tracing::instrument(skip(runtime))]
pub async fn serve<R: Runtime + 'static>(runtime: R, config: ServerConfig) -> Result<()> {
    let service = Arc::new(DataService::in_dir(runtime, &config.data_dir));

    info!("Loading release data from {}...", service.csv_path().display());
    let loading = Arc::clone(&service);
    tokio::task::spawn_blocking(move || loading.initialize())
        .await
        .context("Data service initialization task failed")?
        .context("Failed to initialize data service. Run `release-stats analyze` first")?;

    start_server(&config, service).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_serve_fails_when_data_is_missing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_dir: PathBuf::from("/nonexistent"),
            cors_origin: "*".to_string(),
        };

        let err = serve(runtime, config).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Release data file not found"));
    }
}
