use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use repo_core::{RepoConfig, RepositoryService};
use repo_storage::ArtifactStore;

/// Main entry point for the Lambda Repo server
///
/// Serves the Maven repository over HTTP on `LAMBDA_REPO_ADDR`, backed by the object
/// store named by `LAMBDA_REPO_STORAGE_URL`.
///
/// # Environment Variables
/// - `LAMBDA_REPO_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `LAMBDA_REPO_STORAGE_URL`: Object store URL (default: `repository/` in the working directory)
/// - `LAMBDA_REPO_NAME`: Title shown on listing pages
/// - `LAMBDA_REPO_ALLOW_EMPTY_ROOT`: Render an empty root listing instead of 404
/// - `LAMBDA_REPO_METADATA_CHECKSUMS`: Checksum suffixes accepted on `maven-metadata.xml`
/// - `LAMBDA_REPO_MAX_UPLOAD_BYTES`: Upload size limit
///
/// # Errors
/// Returns an error if the configuration is invalid, the object store cannot be opened,
/// the address cannot be bound, or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lambda_repo=info".parse()?)
                .add_directive("repo_core=info".parse()?)
                .add_directive("repo_storage=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("LAMBDA_REPO_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = RepoConfig::from_lookup(|name| std::env::var(name).ok())?;
    let store = ArtifactStore::from_url(config.storage_url())?;
    tracing::info!(
        "++ Starting {} on {} (storage: {})",
        config.repository_name(),
        addr,
        config.storage_url()
    );

    let service = RepositoryService::new(store, Arc::new(config));
    let app = router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutting down");
}
