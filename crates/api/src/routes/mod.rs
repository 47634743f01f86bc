pub mod analytics;
pub mod dashboard;
pub mod health;
pub mod receipts;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /receipts/ingest                  extract + validate + store (POST)
/// /receipts                         list with filters (GET)
/// /receipts/batch-delete            delete many by bill id (POST)
/// /receipts/{bill_id}               detail (GET), delete (DELETE)
/// /receipts/{bill_id}/validation    re-validate stored record (GET)
///
/// /validation/validate              dry-run validation (POST)
///
/// /dashboard/summary                store-wide totals (GET)
///
/// /analytics/summary                KPIs over a date range (GET)
/// /analytics/trends                 time series + forecast (GET)
/// /analytics/categories             per-category totals (GET)
/// /analytics/vendors                top vendors (GET)
/// /analytics/subscriptions          recurring-vendor detection (GET)
/// /analytics/budget                 monthly burn rate (GET)
/// /analytics/export.csv             CSV export (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/receipts", receipts::router())
        // A router nested at `/receipts` serves its root route only at the
        // exact prefix (`/receipts`); axum 0.8 does not forward the
        // trailing-slash form (`/receipts/`) to the nested `/` route. Alias
        // the trailing-slash listing URL to the same `list` handler so both
        // spellings reach it.
        .route("/receipts/", axum::routing::get(crate::handlers::receipts::list))
        .nest("/validation", validation::router())
        .nest("/dashboard", dashboard::router())
        .nest("/analytics", analytics::router())
}
