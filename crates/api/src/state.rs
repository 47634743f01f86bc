use std::sync::Arc;

use receiptvault_extract::ReceiptExtractor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: receiptvault_db::DbPool,
    /// Server configuration (validation parameters, budget, CORS).
    pub config: Arc<ServerConfig>,
    /// Vision extractor; `None` when no API key is configured, in which
    /// case ingestion uses the OCR text parser only.
    pub extractor: Option<Arc<dyn ReceiptExtractor>>,
}
