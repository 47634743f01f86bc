//! Route definitions for the `/receipts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::receipts;
use crate::state::AppState;

/// Routes mounted at `/receipts`.
///
/// ```text
/// POST   /ingest                   -> ingest
/// GET    /                         -> list          (?bill_id, ?vendor, ...)
/// POST   /batch-delete             -> batch_delete
/// GET    /{bill_id}                -> get_receipt
/// DELETE /{bill_id}                -> delete_receipt
/// GET    /{bill_id}/validation     -> revalidate    (skip-duplicate mode)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(receipts::ingest))
        .route("/", get(receipts::list))
        .route("/batch-delete", post(receipts::batch_delete))
        .route(
            "/{bill_id}",
            get(receipts::get_receipt).delete(receipts::delete_receipt),
        )
        .route("/{bill_id}/validation", get(receipts::revalidate))
}
