//! Battlefield server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use battlefield_api::{middleware::AppState, router as api_router};
use battlefield_common::Config;
use battlefield_core::{AdminService, LocationService, ModerationService};
use battlefield_db::repositories::{LocationRepository, ModerationRepository, NoteRepository};
use sea_orm::DatabaseConnection;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Close the pool if this is the last handle to it. Returns whether it was closed.
async fn close_database(db: Arc<DatabaseConnection>) -> bool {
    match Arc::try_unwrap(db) {
        Ok(db) => match db.close().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to close database connection");
                false
            }
        },
        Err(db) => {
            warn!(
                handles = Arc::strong_count(&db),
                "Database connection still shared at shutdown, leaving pool to drop"
            );
            false
        }
    }
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battlefield=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting battlefield server...");

    let config = Config::load().context("Failed to load configuration")?;

    let db = battlefield_db::init(&config)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    info!("Running database migrations...");
    battlefield_db::migrate(&db)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    let db = Arc::new(db);
    let op_timeout = Duration::from_secs(config.database.operation_timeout_secs);

    // Initialize repositories
    let location_repo = LocationRepository::new(Arc::clone(&db)).with_operation_timeout(op_timeout);
    let note_repo = NoteRepository::new(Arc::clone(&db)).with_operation_timeout(op_timeout);
    let moderation_repo =
        ModerationRepository::new(Arc::clone(&db)).with_operation_timeout(op_timeout);

    // Initialize services
    let location_service = LocationService::new(location_repo.clone(), note_repo.clone());
    let moderation_service = ModerationService::new(moderation_repo, location_repo, note_repo);
    let admin_service = AdminService::new(config.admin.password.as_str());

    let state = AppState {
        location_service,
        moderation_service,
        admin_service,
    };

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router and every repository handle are gone once serve returns.
    close_database(db).await;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_close_database_with_last_handle() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        assert!(close_database(db).await);
    }

    #[tokio::test]
    async fn test_close_database_skips_shared_handle() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let other = Arc::clone(&db);

        assert!(!close_database(db).await);
        assert_eq!(Arc::strong_count(&other), 1);
    }
}
