use std::sync::Arc;

use maktaba_core::store::FileStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The file store is constructed once at startup and injected here instead of
/// living in module-level globals.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: maktaba_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-disk store for uploaded book files.
    pub files: Arc<FileStore>,
}
