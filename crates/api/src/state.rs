use std::sync::Arc;

use crate::config::ServerConfig;
use crate::jikan::JikanClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: levelup_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Jikan client used by search and the calendar sync.
    pub jikan: Arc<JikanClient>,
}
