//! Handler for dry-run validation of a supplied record.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use receiptvault_core::receipt::ReceiptDraft;
use receiptvault_core::validation::{validate, PrefetchedLookup};
use receiptvault_db::repositories::ReceiptRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the validation (dry-run) endpoint.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub record: ReceiptDraft,
    /// Skip the duplicate rule, e.g. when checking a record the caller
    /// knows is already stored.
    #[serde(default)]
    pub skip_duplicate: bool,
}

/// POST /api/v1/validation/validate
///
/// Validate a record without persisting anything. Always returns 200
/// with a report; rule failures are payload, not HTTP errors.
pub async fn validate_record(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> AppResult<impl IntoResponse> {
    // Point-read the existence flag up front; the sync rule engine then
    // consumes it through the lookup contract.
    let is_duplicate = match (&body.record.bill_id, body.skip_duplicate) {
        (Some(bill_id), false) => ReceiptRepo::exists(&state.pool, bill_id).await?,
        _ => false,
    };

    let report = validate(
        &body.record,
        &state.config.validation,
        &PrefetchedLookup(is_duplicate),
        body.skip_duplicate,
    )?;

    Ok(Json(DataResponse { data: report }))
}
