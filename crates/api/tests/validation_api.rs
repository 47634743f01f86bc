//! Integration tests for the dry-run validation endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, seed_receipt};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../db/migrations")]
async fn dry_run_returns_a_report_without_persisting(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/validation/validate",
        json!({
            "record": {
                "bill_id": "DR-1",
                "vendor": "Fresh Mart",
                "date": "2024-05-01",
                "amount": 108,
                "tax": 8
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["passed"], true);
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 5);

    // Dry-run: nothing was stored.
    let listing = body_json(get(app, "/api/v1/receipts/").await).await;
    assert_eq!(listing["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dry_run_flags_an_existing_duplicate(pool: SqlitePool) {
    seed_receipt(&pool, "DR-2", "Fresh Mart", "Groceries", "2024-05-01", 8.0, 108.0).await;
    let app = common::build_test_app(pool);

    let record = json!({
        "bill_id": "DR-2",
        "vendor": "Fresh Mart",
        "date": "2024-05-01",
        "amount": 108,
        "tax": 8
    });

    // Duplicate check active: the stored record's presence fails the run.
    let response = post_json(
        app.clone(),
        "/api/v1/validation/validate",
        json!({ "record": record.clone() }),
    )
    .await;
    let report = body_json(response).await;
    assert_eq!(report["data"]["passed"], false);

    // Skip-duplicate mode: the same record passes and the rule is omitted.
    let response = post_json(
        app,
        "/api/v1/validation/validate",
        json!({ "record": record, "skip_duplicate": true }),
    )
    .await;
    let report = body_json(response).await;
    assert_eq!(report["data"]["passed"], true);
    assert_eq!(report["data"]["results"].as_array().unwrap().len(), 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dry_run_degrades_junk_amount_into_a_rule_failure(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/validation/validate",
        json!({
            "record": {
                "bill_id": "DR-3",
                "vendor": "Fresh Mart",
                "date": "2024-05-01",
                "amount": "abc",
                "tax": 0
            }
        }),
    )
    .await;

    // Junk input is a report, never a 4xx/5xx.
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["passed"], false);

    let results = json["data"]["results"].as_array().unwrap();
    let total = results
        .iter()
        .find(|r| r["title"] == "Total Validation")
        .unwrap();
    assert_eq!(total["status"], "error");
    assert_eq!(total["message"], "Invalid amount value");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn dry_run_reports_rules_in_fixed_order(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/validation/validate",
        json!({
            "record": {
                "bill_id": "DR-4",
                "vendor": "Fresh Mart",
                "date": "not-a-date",
                "amount": 50,
                "tax": 40
            }
        }),
    )
    .await;

    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Required Fields",
            "Date Format",
            "Total Validation",
            "Tax Rate Validation",
            "Duplicate Detection"
        ]
    );
}
