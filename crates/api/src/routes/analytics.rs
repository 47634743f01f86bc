//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /summary        -> summary         (?start, ?end)
/// GET /trends         -> trends          (?start, ?end, ?window)
/// GET /categories     -> categories
/// GET /vendors        -> vendors         (?limit)
/// GET /subscriptions  -> subscriptions
/// GET /budget         -> budget          (?limit)
/// GET /export.csv     -> export_csv      (?start, ?end)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(analytics::summary))
        .route("/trends", get(analytics::trends))
        .route("/categories", get(analytics::categories))
        .route("/vendors", get(analytics::vendors))
        .route("/subscriptions", get(analytics::subscriptions))
        .route("/budget", get(analytics::budget))
        .route("/export.csv", get(analytics::export_csv))
}
