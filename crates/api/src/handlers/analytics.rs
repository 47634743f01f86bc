//! Handlers for the `/analytics` resource: KPIs, trends, breakdowns,
//! budget burn rate, and CSV export.

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use receiptvault_core::analytics::budget::{burn_rate, days_in_month, BurnRate};
use receiptvault_core::analytics::forecast::{project_month_spend, quadratic_trend};
use receiptvault_core::analytics::subscriptions::detect_subscriptions;
use receiptvault_core::analytics::summary::{
    category_totals, daily_totals, monthly_totals, moving_average, spending_summary, top_vendors,
    PeriodTotal,
};
use receiptvault_core::analytics::SpendRecord;
use receiptvault_db::models::receipt::Receipt;
use receiptvault_db::repositories::ReceiptRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default window for the moving-average series.
const DEFAULT_MOVING_AVERAGE_WINDOW: usize = 7;
/// Default number of vendors in the top-vendor breakdown.
const DEFAULT_VENDOR_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Inclusive `YYYY-MM-DD` date range; either bound may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TrendsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    #[validate(range(min = 1, max = 90))]
    pub window: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct VendorsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BudgetQuery {
    /// Budget override; falls back to the configured monthly budget.
    #[validate(range(min = 0.0))]
    pub limit: Option<f64>,
}

async fn load_range(state: &AppState, range: &RangeQuery) -> AppResult<Vec<SpendRecord>> {
    let receipts =
        ReceiptRepo::list_between(&state.pool, range.start.as_deref(), range.end.as_deref())
            .await?;
    Ok(receipts.iter().map(Receipt::to_spend_record).collect())
}

// ---------------------------------------------------------------------------
// KPIs and breakdowns
// ---------------------------------------------------------------------------

/// GET /api/v1/analytics/summary?start&end
pub async fn summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<impl IntoResponse> {
    let records = load_range(&state, &range).await?;
    Ok(Json(DataResponse {
        data: spending_summary(&records),
    }))
}

/// GET /api/v1/analytics/categories
pub async fn categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = load_range(&state, &RangeQuery::default()).await?;
    Ok(Json(DataResponse {
        data: category_totals(&records),
    }))
}

/// GET /api/v1/analytics/vendors?limit
pub async fn vendors(
    State(state): State<AppState>,
    Query(params): Query<VendorsQuery>,
) -> AppResult<impl IntoResponse> {
    let records = load_range(&state, &RangeQuery::default()).await?;
    let limit = params.limit.unwrap_or(DEFAULT_VENDOR_LIMIT);
    Ok(Json(DataResponse {
        data: top_vendors(&records, limit),
    }))
}

/// GET /api/v1/analytics/subscriptions
pub async fn subscriptions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let records = load_range(&state, &RangeQuery::default()).await?;
    Ok(Json(DataResponse {
        data: detect_subscriptions(&records),
    }))
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

/// Trend payload: time series plus forecasts.
#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub monthly: Vec<PeriodTotal>,
    pub daily: Vec<PeriodTotal>,
    /// Moving average aligned with `daily`.
    pub moving_average: Vec<f64>,
    /// Quadratic-trend forecast for the month after the observed series,
    /// absent when too little data exists to fit one.
    pub trend_forecast: Option<f64>,
    /// Naive run-rate projection for a 30-day month.
    pub next_month_projection: f64,
}

/// GET /api/v1/analytics/trends?start&end&window
pub async fn trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsQuery>,
) -> AppResult<impl IntoResponse> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let range = RangeQuery {
        start: params.start.clone(),
        end: params.end.clone(),
    };
    let records = load_range(&state, &range).await?;

    let monthly = monthly_totals(&records);
    let daily = daily_totals(&records);
    let window = params.window.unwrap_or(DEFAULT_MOVING_AVERAGE_WINDOW);
    let daily_values: Vec<f64> = daily.iter().map(|bucket| bucket.total).collect();
    let averaged = moving_average(&daily_values, window);

    let points: Vec<(f64, f64)> = monthly
        .iter()
        .enumerate()
        .map(|(i, bucket)| (i as f64, bucket.total))
        .collect();
    let trend_forecast = quadratic_trend(&points).map(|trend| trend.predict(points.len() as f64));

    let total: f64 = daily_values.iter().sum();
    let next_month_projection = project_month_spend(total, daily.len() as u32, 30);

    Ok(Json(DataResponse {
        data: TrendsResponse {
            monthly,
            daily,
            moving_average: averaged,
            trend_forecast,
            next_month_projection,
        },
    }))
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// Budget payload: the burn rate plus its inputs, for display.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub month: String,
    pub budget: f64,
    pub spent: f64,
    /// Absent before any day of the month has elapsed or with a zero budget.
    pub burn_rate: Option<BurnRate>,
}

/// GET /api/v1/analytics/budget?limit
///
/// Burn rate for the current calendar month.
pub async fn budget(
    State(state): State<AppState>,
    Query(params): Query<BudgetQuery>,
) -> AppResult<impl IntoResponse> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let today = Utc::now().date_naive();
    let month_start = format!("{}-01", today.format("%Y-%m"));
    let month_end = today.format("%Y-%m-%d").to_string();

    let records = load_range(
        &state,
        &RangeQuery {
            start: Some(month_start),
            end: Some(month_end),
        },
    )
    .await?;
    let spent: f64 = records.iter().map(|record| record.amount).sum();

    let budget = params.limit.unwrap_or(state.config.monthly_budget);
    let rate = burn_rate(
        spent,
        budget,
        today.day(),
        days_in_month(today.year(), today.month()),
    );

    Ok(Json(DataResponse {
        data: BudgetResponse {
            month: today.format("%Y-%m").to_string(),
            budget,
            spent,
            burn_rate: rate,
        },
    }))
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// GET /api/v1/analytics/export.csv?start&end
///
/// Export receipts as CSV. Returns `text/csv` content type.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<(StatusCode, [(HeaderName, &'static str); 1], String)> {
    let receipts =
        ReceiptRepo::list_between(&state.pool, range.start.as_deref(), range.end.as_deref())
            .await?;

    let mut csv = String::from("bill_id,vendor,category,date,subtotal,tax,amount\n");
    for receipt in &receipts {
        let subtotal = receipt
            .subtotal
            .map(|value| value.to_string())
            .unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(&receipt.bill_id),
            csv_field(&receipt.vendor),
            csv_field(&receipt.category),
            receipt.date,
            subtotal,
            receipt.tax,
            receipt.amount
        ));
    }

    Ok((StatusCode::OK, [(CONTENT_TYPE, "text/csv")], csv))
}

/// Quote a CSV field only when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
