use std::sync::Arc;

use lawmox_core::crypto::PasswordCipher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lawmox_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Password encryption service, built once from `ENCRYPTION_KEY`.
    pub cipher: Arc<PasswordCipher>,
}
