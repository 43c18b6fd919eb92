//! Settlement endpoint integration tests.

mod common;

use common::{settlement_body, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn create_defaults_status_to_active() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let created = app.create_settlement(&settlement_body()).await;

    assert_eq!(created["status"], 1);
    assert_eq!(created["total_with_vat"], "595000.00");
    assert_eq!(created["service_date"], "2025-01-15");
}

#[tokio::test]
async fn get_missing_settlement_is_not_found() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    assert_eq!(app.get("/settlements/999999999").await.status(), 404);
    assert_eq!(app.delete("/settlements/999999999").await.status(), 404);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let created = app.create_settlement(&settlement_body()).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/settlements/{}", id),
            &json!({ "passenger_count": 3, "notes": "Updated" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();

    assert_eq!(updated["passenger_count"], 3);
    assert_eq!(updated["notes"], "Updated");
    assert_eq!(updated["company_name"], created["company_name"]);
    assert_eq!(updated["vat_rate"], 19);
}

#[tokio::test]
async fn delete_marks_inactive_and_keeps_the_row() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let created = app.create_settlement(&settlement_body()).await;
    let id = created["id"].as_i64().unwrap();

    assert_eq!(
        app.delete(&format!("/settlements/{}", id)).await.status(),
        204
    );

    let fetched: Value = app
        .get(&format!("/settlements/{}", id))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["status"], 0);
}

#[tokio::test]
async fn list_filters_by_search_and_status() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let body = settlement_body();
    let company = body["company_name"].as_str().unwrap().to_string();
    let created = app.create_settlement(&body).await;

    let listed: Value = app
        .get(&format!("/settlements?search={}&status=1", company))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["settlements"][0]["id"], created["id"]);
    assert_eq!(listed["limit"], 50);

    let listed: Value = app
        .get(&format!("/settlements?search={}&status=0", company))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn stats_reflect_deactivation() {
    let Some(app) = TestApp::spawn().await else {
        return;
    };

    let created = app.create_settlement(&settlement_body()).await;
    app.delete(&format!("/settlements/{}", created["id"])).await;

    let stats: Value = app.get("/settlements/stats").await.json().await.unwrap();
    let total = stats["total"].as_i64().unwrap();

    assert!(stats["inactive"].as_i64().unwrap() >= 1);
    assert_eq!(
        total,
        stats["active"].as_i64().unwrap() + stats["inactive"].as_i64().unwrap()
    );
    assert!(stats["by_status"]["0"].as_i64().unwrap() >= 1);
}
