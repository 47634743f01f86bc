//! Handler for the dashboard summary header.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use receiptvault_db::repositories::ReceiptRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
///
/// Store-wide totals: total spending, total tax paid, receipts scanned.
pub async fn summary(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let totals = ReceiptRepo::totals(&state.pool).await?;
    Ok(Json(DataResponse { data: totals }))
}
