use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use lawmox_api::config::{require_env, ConfigError, ServerConfig};
use lawmox_api::router::build_app_router;
use lawmox_api::state::AppState;
use lawmox_core::crypto::PasswordCipher;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lawmox_api=debug,lawmox_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Encryption key (required, no fallback) ---
    let cipher = PasswordCipher::from_base64_key(&require_env("ENCRYPTION_KEY")?)
        .map_err(|e| ConfigError::Invalid {
            name: "ENCRYPTION_KEY",
            reason: e.to_string(),
        })?;
    tracing::info!("Password encryption key loaded");

    // --- Database ---
    let database_url = require_env("DATABASE_URL")?;

    let pool = lawmox_db::create_pool_with_config(&database_url, &config.pool_config()).await?;
    tracing::info!("Database connection pool created");

    lawmox_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    lawmox_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cipher: Arc::new(cipher),
    };

    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let host: IpAddr = config.host.parse().map_err(|e| ConfigError::Invalid {
        name: "HOST",
        reason: format!("{e}"),
    })?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
