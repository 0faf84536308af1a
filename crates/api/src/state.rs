use std::sync::Arc;

use compliance_core::ingest::UploadPolicy;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: compliance_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: compliance_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Upload directory and size ceiling for the ingestion guard.
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::new(&self.config.upload_dir, self.config.max_upload_bytes)
    }
}
