use std::sync::Arc;

use reproot_api::{
    build_router,
    config::PortalConfig,
    services::SmtpMailer,
    store::MongoStore,
    AppState,
};
use reproot_core::observability::logging::init_tracing;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), reproot_core::error::AppError> {
    // Load configuration; fail fast if invalid.
    let config = PortalConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting RepRoot API"
    );

    let store = MongoStore::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    store.initialize_indexes().await?;
    tracing::info!("Database initialized");

    let mailer = SmtpMailer::new(&config.gmail)?;

    let addr = config.common.bind_addr();
    let state = AppState::new(config, Arc::new(store), Arc::new(mailer));
    let app = build_router(state);

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
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

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
