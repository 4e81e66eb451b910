mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, ALICE, BOB, NO_EMAIL};
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_requires_bearer_token() {
    let app = TestApp::new();

    let response = app
        .request(Method::GET, "/api/v1/projects", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], 401);

    let response = app.get("/api/v1/projects", "forged").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_crud() {
    let app = TestApp::new();
    let id = app.create_project(ALICE).await;

    let response = app.get("/api/v1/projects", ALICE).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 1);
    assert_eq!(response.body["projects"][0]["id"], id.as_str());

    let uri = format!("/api/v1/projects/{}", id);
    let response = app
        .put(&uri, ALICE, json!({ "pitch": "Outreach for agencies" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pitch"], "Outreach for agencies");
    assert_eq!(response.body["product_name"], "Acme");

    let response = app.delete(&uri, ALICE).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.get(&uri, ALICE).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_validation() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/v1/projects",
            ALICE,
            json!({ "product_name": "  ", "product_url": "https://acme.dev" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .post(
            "/api/v1/projects",
            ALICE,
            json!({ "product_name": "Acme", "product_url": "ftp://acme.dev" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let id = app.create_project(ALICE).await;
    let response = app
        .put(&format!("/api/v1/projects/{}", id), ALICE, json!({}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_project_is_not_found() {
    let app = TestApp::new();
    let id = app.create_project(ALICE).await;
    let uri = format!("/api/v1/projects/{}", id);

    assert_eq!(app.get(&uri, BOB).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.put(&uri, BOB, json!({ "pitch": "mine now" })).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.delete(&uri, BOB).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get(&format!("{}/scheduler", uri), BOB).await.status,
        StatusCode::NOT_FOUND
    );

    let response = app.get("/api/v1/projects", BOB).await;
    assert_eq!(response.body["count"], 0);

    // still there for the owner
    assert_eq!(app.get(&uri, ALICE).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_scheduler_defaults_and_upsert() {
    let app = TestApp::new();
    let id = app.create_project(ALICE).await;
    let uri = format!("/api/v1/projects/{}/scheduler", id);

    let response = app.get(&uri, ALICE).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["configured"], false);
    assert_eq!(response.body["enabled"], false);
    assert_eq!(response.body["frequency"], "daily");
    assert_eq!(response.body["messages_per_run"], 5);

    let response = app
        .put(
            &uri,
            ALICE,
            json!({ "enabled": true, "frequency": "hourly", "messages_per_run": 10 }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["configured"], true);

    let response = app.get(&uri, ALICE).await;
    assert_eq!(response.body["enabled"], true);
    assert_eq!(response.body["frequency"], "hourly");
    assert_eq!(response.body["messages_per_run"], 10);

    let response = app
        .put(&uri, ALICE, json!({ "enabled": true, "messages_per_run": 0 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.delete(&uri, ALICE).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&uri, ALICE).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri, ALICE).await.body["configured"], false);
}

#[tokio::test]
async fn test_checkout_uses_caller_identity() {
    let app = TestApp::new();

    let response = app.post("/api/v1/checkout", ALICE, json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["session_id"], "cs_test_123");

    let checkouts = app.billing.checkouts.lock().unwrap();
    assert_eq!(checkouts[0].client_reference_id, "alice-uid");
    assert_eq!(
        checkouts[0].customer_email.as_deref(),
        Some("alice@example.com")
    );
    assert!(checkouts[0].success_url.starts_with(common::APP_URL));
}

#[tokio::test]
async fn test_billing_requires_email() {
    let app = TestApp::new();

    let response = app.post("/api/v1/checkout", NO_EMAIL, json!({})).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.get("/api/v1/subscription", NO_EMAIL).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_subscription_status() {
    let app = TestApp::new();

    let response = app.get("/api/v1/subscription", ALICE).await;
    assert_eq!(response.body["active"], true);

    app.billing.active.store(false, Ordering::SeqCst);
    let response = app.get("/api/v1/subscription", ALICE).await;
    assert_eq!(response.body["active"], false);
    assert_eq!(response.body["status"], "none");
}

#[tokio::test]
async fn test_discover_requires_subscription() {
    let app = TestApp::new();
    let id = app.create_project(ALICE).await;
    let uri = format!("/api/v1/projects/{}/discover", id);

    app.billing.active.store(false, Ordering::SeqCst);
    let response = app.post(&uri, ALICE, json!({})).await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);

    app.billing.active.store(true, Ordering::SeqCst);
    let response = app.post(&uri, ALICE, json!({})).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["subreddits"][0]["name"], "SaaS");
    assert_eq!(response.body["leads"][0]["username"], "indiehacker42");
}

#[tokio::test]
async fn test_rejected_requests_use_error_body() {
    let app = TestApp::new();

    let response = app.get("/api/v1/projects/not-a-uuid", ALICE).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 400);
    assert!(response.body["error"].is_string());

    let response = app
        .post("/api/v1/projects", ALICE, json!({ "product_name": 5 }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 400);

    let id = app.create_project(ALICE).await;
    let response = app
        .get(
            &format!("/api/v1/projects/{}/interactions?limit=many", id),
            ALICE,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], 400);
}
