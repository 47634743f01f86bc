//! Integration tests for the dashboard and analytics endpoints.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, body_text, get, seed_receipt};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_summary_totals_the_store(pool: SqlitePool) {
    seed_receipt(&pool, "D-1", "Fresh Mart", "Groceries", "2024-05-01", 8.0, 108.0).await;
    seed_receipt(&pool, "D-2", "City Garage", "Auto", "2024-05-02", 0.0, 500.0).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/dashboard/summary").await).await;

    assert_eq!(json["data"]["receipt_count"], 2);
    assert_eq!(json["data"]["total_spend"], 608.0);
    assert_eq!(json["data"]["total_tax"], 8.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dashboard_summary_of_an_empty_store_is_zero(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/dashboard/summary").await).await;

    assert_eq!(json["data"]["receipt_count"], 0);
    assert_eq!(json["data"]["total_spend"], 0.0);
}

// ---------------------------------------------------------------------------
// KPI summary and breakdowns
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn analytics_summary_respects_the_date_range(pool: SqlitePool) {
    seed_receipt(&pool, "K-1", "Fresh Mart", "Groceries", "2024-01-10", 0.0, 100.0).await;
    seed_receipt(&pool, "K-2", "Fresh Mart", "Groceries", "2024-02-10", 0.0, 200.0).await;
    seed_receipt(&pool, "K-3", "City Garage", "Auto", "2024-03-10", 0.0, 400.0).await;
    let app = common::build_test_app(pool);

    let json = body_json(
        get(app, "/api/v1/analytics/summary?start=2024-02-01&end=2024-02-28").await,
    )
    .await;

    assert_eq!(json["data"]["receipt_count"], 1);
    assert_eq!(json["data"]["total_spend"], 200.0);
    assert_eq!(json["data"]["top_category"]["category"], "Groceries");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn category_and_vendor_breakdowns_are_ordered(pool: SqlitePool) {
    seed_receipt(&pool, "B-1", "Fresh Mart", "Groceries", "2024-05-01", 0.0, 100.0).await;
    seed_receipt(&pool, "B-2", "Fresh Mart", "Groceries", "2024-05-05", 0.0, 150.0).await;
    seed_receipt(&pool, "B-3", "City Garage", "Auto", "2024-05-09", 0.0, 400.0).await;
    let app = common::build_test_app(pool);

    let categories = body_json(get(app.clone(), "/api/v1/analytics/categories").await).await;
    let data = categories["data"].as_array().unwrap();
    assert_eq!(data[0]["category"], "Auto");
    assert_eq!(data[1]["category"], "Groceries");
    assert_eq!(data[1]["total"], 250.0);

    let vendors = body_json(get(app, "/api/v1/analytics/vendors?limit=1").await).await;
    let data = vendors["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["vendor"], "City Garage");
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn trends_return_aligned_series(pool: SqlitePool) {
    seed_receipt(&pool, "T-1", "Fresh Mart", "Groceries", "2024-01-05", 0.0, 100.0).await;
    seed_receipt(&pool, "T-2", "Fresh Mart", "Groceries", "2024-01-20", 0.0, 50.0).await;
    seed_receipt(&pool, "T-3", "Fresh Mart", "Groceries", "2024-02-05", 0.0, 200.0).await;
    seed_receipt(&pool, "T-4", "Fresh Mart", "Groceries", "2024-03-05", 0.0, 300.0).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/analytics/trends?window=2").await).await;

    let monthly = json["data"]["monthly"].as_array().unwrap();
    assert_eq!(monthly.len(), 3);
    assert_eq!(monthly[0]["period"], "2024-01");
    assert_eq!(monthly[0]["total"], 150.0);

    let daily = json["data"]["daily"].as_array().unwrap();
    let averaged = json["data"]["moving_average"].as_array().unwrap();
    assert_eq!(daily.len(), 4);
    assert_eq!(averaged.len(), daily.len());

    // Three monthly points fit a quadratic; a forecast is present.
    assert!(json["data"]["trend_forecast"].is_number());
    assert!(json["data"]["next_month_projection"].as_f64().unwrap() > 0.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn trends_reject_an_out_of_range_window(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/analytics/trends?window=500").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn subscriptions_detect_a_recurring_vendor(pool: SqlitePool) {
    seed_receipt(&pool, "S-1", "StreamCo", "Entertainment", "2024-01-10", 0.0, 499.0).await;
    seed_receipt(&pool, "S-2", "StreamCo", "Entertainment", "2024-02-10", 0.0, 499.0).await;
    seed_receipt(&pool, "S-3", "StreamCo", "Entertainment", "2024-03-11", 0.0, 499.0).await;
    seed_receipt(&pool, "S-4", "Fresh Mart", "Groceries", "2024-02-14", 0.0, 820.0).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/analytics/subscriptions").await).await;
    let data = json["data"].as_array().unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["vendor"], "StreamCo");
    assert_eq!(data[0]["occurrences"], 3);
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn budget_reports_current_month_burn_rate(pool: SqlitePool) {
    // Seed a receipt dated today so it lands in the current month window.
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    seed_receipt(&pool, "M-1", "Fresh Mart", "Groceries", &today, 0.0, 2500.0).await;
    let app = common::build_test_app(pool);

    let json = body_json(get(app, "/api/v1/analytics/budget?limit=50000").await).await;

    assert_eq!(json["data"]["budget"], 50000.0);
    assert_eq!(json["data"]["spent"], 2500.0);
    assert_eq!(
        json["data"]["month"],
        Utc::now().date_naive().format("%Y-%m").to_string()
    );
    assert!(json["data"]["burn_rate"]["percent_used"].as_f64().unwrap() > 0.0);
    assert!(json["data"]["burn_rate"]["status"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn budget_rejects_a_negative_limit(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/analytics/budget?limit=-10").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn export_csv_returns_text_csv_with_header_and_rows(pool: SqlitePool) {
    seed_receipt(&pool, "C-1", "Fresh Mart", "Groceries", "2024-05-01", 8.0, 108.0).await;
    seed_receipt(&pool, "C-2", "Odd, Name & Co", "Misc", "2024-05-02", 0.0, 75.5).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/analytics/export.csv").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/csv"
    );

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "bill_id,vendor,category,date,subtotal,tax,amount"
    );
    // Oldest first; the comma-bearing vendor is quoted.
    assert_eq!(lines.next().unwrap(), "C-1,Fresh Mart,Groceries,2024-05-01,,8,108");
    assert_eq!(
        lines.next().unwrap(),
        "C-2,\"Odd, Name & Co\",Misc,2024-05-02,,0,75.5"
    );
    assert!(lines.next().is_none());
}
