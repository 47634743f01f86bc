//! Route definitions for the `/validation` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::validation;
use crate::state::AppState;

/// Routes mounted at `/validation`.
///
/// ```text
/// POST /validate   -> validate_record   (dry-run, nothing persisted)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/validate", post(validation::validate_record))
}
