//! HTTP API integration tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`; no socket
//! is bound.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use mailmerge_service::config::Settings;
use mailmerge_service::server::{create_app, AppState};

fn app() -> Router {
    create_app(AppState::new(Settings::default()))
}

fn app_with_batch_limit(max_batch_size: usize) -> Router {
    let mut settings = Settings::default();
    settings.merge.max_batch_size = max_batch_size;
    create_app(AppState::new(settings))
}

fn app_with_output_limit(max_output_bytes: usize) -> Router {
    let mut settings = Settings::default();
    settings.merge.max_output_bytes = max_output_bytes;
    create_app(AppState::new(settings))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptimeSeconds"].is_u64());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_personalization_variables() {
    let (status, body) = send(app(), Method::GET, "/api/email/personalization-variables", None).await;

    assert_eq!(status, StatusCode::OK);
    let vars = body.as_array().unwrap();
    assert_eq!(vars.len(), 16);
    assert_eq!(vars[0]["name"], "email");
    assert_eq!(vars[15]["name"], "Custom fields");
}

#[tokio::test]
async fn test_personalization_documentation() {
    let (status, body) =
        send(app(), Method::GET, "/api/email/personalization-documentation", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["documentation"]
        .as_str()
        .unwrap()
        .contains("<code>{firstname}</code>"));
}

#[tokio::test]
async fn test_parse_recipient() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/email/parse-recipient",
        Some(json!({ "recipientLine": "john.doe@acme.com|position=CEO" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["variables"]["firstname"], "John");
    assert_eq!(body["variables"]["company"], "Acme");
    assert_eq!(body["variables"]["position"], "CEO");
}

#[tokio::test]
async fn test_parse_recipient_requires_line() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/email/parse-recipient",
        Some(json!({ "recipientLine": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Recipient line is required");
}

#[tokio::test]
async fn test_apply_merge() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/email/apply-enhanced-merge",
        Some(json!({
            "template": "Hello {firstname}, {{position}} at {company}{missing}",
            "recipientLine": "john.doe@acme.com|firstname=John|position=CEO"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Hello John, CEO at Acme");
    assert_eq!(body["unknownVariables"], json!(["missing"]));
}

#[tokio::test]
async fn test_apply_merge_requires_template() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/email/apply-enhanced-merge",
        Some(json!({ "recipientLine": "a@b.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Template and recipient line are required");
}

#[tokio::test]
async fn test_merge_batch() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/email/merge-batch",
        Some(json!({
            "subjects": ["For {firstname}", "Also for {firstname}"],
            "template": "{company}",
            "recipients": ["ann@alpha.io", "  "],
            "recipientsText": "bob@beta.org\n\nnot-an-email\n"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["subject"], "For Ann");
    assert_eq!(messages[1]["subject"], "Also for Bob");
    assert_eq!(messages[1]["body"], "Beta");
    assert_eq!(messages[2]["email"], "not-an-email");
    assert_eq!(messages[2]["malformedAddress"], true);
    assert!(messages[0].get("malformedAddress").is_none());
}

#[tokio::test]
async fn test_merge_batch_limits() {
    let (status, _) = send(
        app(),
        Method::POST,
        "/api/email/merge-batch",
        Some(json!({ "template": "x", "recipients": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app_with_batch_limit(1),
        Method::POST,
        "/api/email/merge-batch",
        Some(json!({ "template": "x", "recipients": ["a@b.com", "c@d.com"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Batch of 2 recipients exceeds the limit of 1"
    );
}

#[tokio::test]
async fn test_merge_batch_rejects_oversized_output() {
    // ~6 KB request expanding to ~950 KB of merged bodies
    let recipients: Vec<String> = (0..100).map(|i| format!("member{}@example.com", i)).collect();
    let (status, body) = send(
        app_with_output_limit(64 * 1024),
        Method::POST,
        "/api/email/merge-batch",
        Some(json!({ "template": "{email}".repeat(500), "recipients": recipients })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Merged output exceeds the limit of 65536 bytes"
    );
}

#[tokio::test]
async fn test_merge_batch_within_output_limit() {
    let (status, body) = send(
        app_with_output_limit(64),
        Method::POST,
        "/api/email/merge-batch",
        Some(json!({
            "subjects": ["Hi"],
            "template": "{emailname}",
            "recipients": ["ann@alpha.io", "bob@beta.org"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_analyze_variables() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/template/analyze-variables",
        Some(json!({
            "template": "{email} {{email}} {position}",
            "recipientLine": "a@b.com"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPlaceholders"], 3);
    assert_eq!(body["variables"][0]["name"], "email");
    assert_eq!(body["variables"][0]["kind"], "builtin");
    assert_eq!(body["variables"][1]["kind"], "custom");
    assert_eq!(body["inconsistentNames"], json!(["email"]));
    assert_eq!(body["missing"], json!(["position"]));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    send(
        app(),
        Method::POST,
        "/api/email/parse-recipient",
        Some(json!({ "recipientLine": "a@b.com" })),
    )
    .await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("mailmerge_records_built_total"));
}
