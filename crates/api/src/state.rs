use std::sync::Arc;

use inmo_llm::LlmClient;
use inmo_storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inmo_db::DbPool,
    /// Server configuration (session settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
    /// Where entity photos are stored.
    pub blob_store: Arc<dyn BlobStore>,
    /// Chat-completion client for the avatar.
    pub llm: LlmClient,
}
