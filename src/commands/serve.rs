//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Arc::new(
        Database::connect(&config.database_url)
            .await
            .map_err(|e| AppError::internal_with(e, "database connection failed"))?,
    );

    let app_state = AppState::from_config(db, &config);
    let app = create_router(app_state);

    let addr = format!(
        "{}:{}",
        args.host.unwrap_or(config.server_host),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal_with(e, format!("failed to bind to {}", addr)))?;

    tracing::info!(storage = %config.storage_public_url, "Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal_with(e, "server error"))?;

    Ok(())
}
