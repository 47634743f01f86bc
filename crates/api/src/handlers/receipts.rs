//! Handlers for the `/receipts` resource: ingestion, listing, deletion,
//! and re-validation of stored records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use receiptvault_core::error::CoreError;
use receiptvault_core::receipt::{coerce_amount, is_present, ReceiptDraft};
use receiptvault_core::validation::report::{RuleStatus, RULE_REQUIRED_FIELDS};
use receiptvault_core::validation::{validate, PrefetchedLookup, ValidationReport};
use receiptvault_db::models::receipt::{CreateReceipt, LineItemRow, Receipt, ReceiptFilter};
use receiptvault_db::repositories::ReceiptRepo;
use receiptvault_extract::text_parser::parse_receipt_text;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Request body for receipt ingestion.
///
/// Exactly one input source is used, in priority order: a prepared
/// `record` (e.g. from a client-side extraction), a base64 `image` for
/// the vision path, or raw `ocr_text` for the parser fallback.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub record: Option<ReceiptDraft>,
    pub image_base64: Option<String>,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    pub ocr_text: Option<String>,
}

fn default_mime_type() -> String {
    "image/jpeg".to_string()
}

/// Response body for ingestion: the extracted record, its validation
/// report, and whether it was stored.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub record: ReceiptDraft,
    pub report: ValidationReport,
    pub saved: bool,
}

/// POST /api/v1/receipts/ingest
///
/// Run the upload flow: extract (when not already extracted), validate
/// with duplicate detection active, and store. Duplicates are never
/// stored; records that merely fail other rules still are, so a bad
/// receipt remains inspectable from the dashboard.
pub async fn ingest(
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> AppResult<impl IntoResponse> {
    let draft = resolve_draft(&state, body).await?;

    let is_duplicate = match draft.bill_id.as_deref() {
        Some(bill_id) => ReceiptRepo::exists(&state.pool, bill_id).await?,
        None => false,
    };

    let report = validate(
        &draft,
        &state.config.validation,
        &PrefetchedLookup(is_duplicate),
        false,
    )?;

    let storable = !is_duplicate && required_fields_passed(&report);
    let saved = if storable {
        let input = to_create_dto(&draft);
        ReceiptRepo::create(&state.pool, &input).await?;
        true
    } else {
        false
    };

    tracing::info!(
        bill_id = draft.bill_id.as_deref().unwrap_or("<missing>"),
        passed = report.passed,
        saved,
        "Receipt ingested"
    );

    Ok(Json(DataResponse {
        data: IngestResponse {
            record: draft,
            report,
            saved,
        },
    }))
}

/// Resolve the candidate record from whichever input the request carried.
async fn resolve_draft(state: &AppState, body: IngestRequest) -> AppResult<ReceiptDraft> {
    if let Some(record) = body.record {
        return Ok(record);
    }
    if let Some(image_base64) = &body.image_base64 {
        let extractor = state.extractor.as_ref().ok_or_else(|| {
            AppError::BadRequest(
                "image extraction requires a configured vision API key".to_string(),
            )
        })?;
        let draft = extractor.extract_image(image_base64, &body.mime_type).await?;
        return Ok(draft);
    }
    if let Some(ocr_text) = &body.ocr_text {
        return Ok(parse_receipt_text(ocr_text));
    }
    Err(AppError::BadRequest(
        "provide one of record, image_base64, or ocr_text".to_string(),
    ))
}

/// Whether the required-fields gate passed (the draft is storable).
fn required_fields_passed(report: &ValidationReport) -> bool {
    report
        .rule(RULE_REQUIRED_FIELDS)
        .is_some_and(|rule| rule.status == RuleStatus::Success)
}

/// Map a gate-passing draft onto the insert DTO, coercing numerics the
/// same way the validator does.
fn to_create_dto(draft: &ReceiptDraft) -> CreateReceipt {
    CreateReceipt {
        bill_id: draft.bill_id.clone().unwrap_or_default(),
        vendor: draft.vendor.clone().unwrap_or_default(),
        category: draft.category_or_default().to_string(),
        date: draft.date.clone().unwrap_or_default(),
        subtotal: is_present(draft.subtotal.as_ref())
            .then(|| coerce_amount(draft.subtotal.as_ref())),
        tax: coerce_amount(draft.tax.as_ref()),
        amount: coerce_amount(draft.amount.as_ref()),
        items: draft.items.clone(),
    }
}

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

/// GET /api/v1/receipts
///
/// List stored receipts, newest first, with the dashboard's substring
/// filters (`bill_id`, `vendor`, `subtotal`, `tax`, `amount`).
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ReceiptFilter>,
) -> AppResult<impl IntoResponse> {
    let receipts = ReceiptRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: receipts }))
}

/// A stored receipt with its line items.
#[derive(Debug, Serialize)]
pub struct ReceiptDetail {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub items: Vec<LineItemRow>,
}

/// GET /api/v1/receipts/{bill_id}
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let receipt = ReceiptRepo::find_by_bill_id(&state.pool, &bill_id)
        .await?
        .ok_or_else(|| not_found(&bill_id))?;
    let items = ReceiptRepo::list_items(&state.pool, receipt.id).await?;

    Ok(Json(DataResponse {
        data: ReceiptDetail { receipt, items },
    }))
}

// ---------------------------------------------------------------------------
// Re-validation of a stored record
// ---------------------------------------------------------------------------

/// GET /api/v1/receipts/{bill_id}/validation
///
/// Re-run validation for a record that is already stored. Runs in
/// skip-duplicate mode so the record's own presence is not flagged.
pub async fn revalidate(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let receipt = ReceiptRepo::find_by_bill_id(&state.pool, &bill_id)
        .await?
        .ok_or_else(|| not_found(&bill_id))?;

    // The lookup is never consulted in skip-duplicate mode.
    let report = validate(
        &receipt.to_draft(),
        &state.config.validation,
        &PrefetchedLookup(false),
        true,
    )?;

    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/v1/receipts/{bill_id}
///
/// Returns 204 on success, 404 if the bill id is unknown.
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = ReceiptRepo::delete_by_bill_id(&state.pool, &bill_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&bill_id))
    }
}

/// Request body for batch deletion.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchDeleteRequest {
    #[validate(length(min = 1, message = "bill_ids must not be empty"))]
    pub bill_ids: Vec<String>,
}

/// Response body for batch deletion.
#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: u64,
}

/// POST /api/v1/receipts/batch-delete
pub async fn batch_delete(
    State(state): State<AppState>,
    Json(body): Json<BatchDeleteRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let deleted = ReceiptRepo::delete_many(&state.pool, &body.bill_ids).await?;
    tracing::info!(deleted, "Batch delete completed");
    Ok(Json(DataResponse {
        data: BatchDeleteResponse { deleted },
    }))
}

fn not_found(bill_id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Receipt",
        id: bill_id.to_string(),
    })
}
