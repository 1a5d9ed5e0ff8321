//! HTTP API tests.
//!
//! Run with: cargo test --features server,local --test server_test

#![cfg(all(feature = "server", feature = "local"))]

use std::sync::Arc;

use http_body_util::BodyExt;
use mailrecord::providers::LocalTransport;
use mailrecord::{EmailPipeline, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

use mailrecord::server::reexports::*;

fn app() -> (axum::Router, LocalTransport, Arc<MemoryStore>) {
    let transport = LocalTransport::new();
    let store = MemoryStore::shared();
    let pipeline = EmailPipeline::new(Arc::new(transport.clone()), store.clone());
    (mailrecord::server::router(pipeline), transport, store)
}

fn post_email(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/emails")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// POST /v1/emails
// ============================================================================

#[tokio::test]
async fn test_create_returns_record() {
    let (app, transport, store) = app();

    let response = app
        .oneshot(post_email(json!({"to": "a@x.com", "subject": "Hi", "message": "Body"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["to"], "a@x.com");
    assert_eq!(json["subject"], "Hi");
    assert_eq!(json["message"], "Body");
    assert!(json["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(json["created"].is_string());

    assert_eq!(transport.sent_count(), 1);
    assert_eq!(store.count(), 1);
}

#[tokio::test]
async fn test_create_transport_failure_is_bad_gateway() {
    let (app, transport, store) = app();
    transport.set_failure("connection refused");

    let response = app
        .oneshot(post_email(json!({"to": "a@x.com", "subject": "Hi", "message": "Body"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["stage"], "transport");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
    assert_eq!(store.count(), 0);
}

#[tokio::test]
async fn test_create_store_failure_is_internal_error() {
    let (app, transport, store) = app();
    store.fail_inserts("disk full");

    let response = app
        .oneshot(post_email(json!({"to": "a@x.com", "subject": "Hi", "message": "Body"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["error"]["stage"], "store");
    // Delivered but not recorded
    assert_eq!(transport.sent_count(), 1);
}

#[tokio::test]
async fn test_create_without_recipient_is_unprocessable() {
    let (app, transport, _) = app();

    let response = app
        .oneshot(post_email(json!({"subject": "Hi", "message": "Body"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert_eq!(json["error"]["stage"], "validation");
    assert_eq!(transport.attempt_count(), 0);
}

#[tokio::test]
async fn test_create_malformed_json_is_rejected() {
    let (app, transport, _) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/emails")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(transport.attempt_count(), 0);
}

// ============================================================================
// GET /v1/emails
// ============================================================================

#[tokio::test]
async fn test_list_empty_is_empty_array() {
    let (app, _, _) = app();

    let response = app.oneshot(get("/v1/emails")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_list_returns_created_records() {
    let (app, _, _) = app();

    for to in ["a@x.com", "b@x.com"] {
        let response = app
            .clone()
            .oneshot(post_email(json!({"to": to, "subject": "Hi", "message": "Body"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get("/v1/emails")).await.unwrap();
    let json = json_body(response).await;
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["to"], "a@x.com");
    assert_eq!(records[1]["to"], "b@x.com");
}

#[tokio::test]
async fn test_list_store_failure_is_internal_error() {
    let (app, _, store) = app();
    store.fail_reads("connection reset");

    let response = app.oneshot(get("/v1/emails")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"]["stage"], "store");
}

// ============================================================================
// Health and CORS
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _, _) = app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], mailrecord::VERSION);
    assert_eq!(json["provider"], "local");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _, _) = app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/v1/emails")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("GET"));
}
