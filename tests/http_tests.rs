// Integration tests for the HTTP API
//
// Requests go straight into the axum router via tower's `oneshot`, with the
// controller wired to the fake voice client.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{final_text, harness, wait_for};
use serde_json::{json, Value};
use sona::session::SessionStatus;
use sona::{create_router, AppState};
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let app = create_router(AppState::new(h.controller.clone()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_lifecycle_over_http() {
    let h = harness();
    let app = create_router(AppState::new(h.controller.clone()));

    let (status, body) = send(&app, "GET", "/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["muted"], false);

    let (status, body) = send(&app, "POST", "/session/start", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_ne!(body["status"], "idle");

    wait_for(&h.controller, |s| s.status == SessionStatus::Active).await;

    let (status, _) = send(&app, "POST", "/session/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    h.controller.handle_event(final_text("assistant", "Hello!")).await;
    h.controller.handle_event(final_text("user", "Hi")).await;

    let (_, body) = send(&app, "GET", "/session", None).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["callActive"], true);
    assert_eq!(body["messages"].as_array().unwrap().len(), 2);
    assert_eq!(body["messages"][1]["isFinal"], true);

    let (status, body) = send(&app, "POST", "/session/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["saved"]["messageCount"], 2);

    let (status, _) = send(&app, "POST", "/session/stop", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_mute_and_voice_endpoints() {
    let h = harness();
    let app = create_router(AppState::new(h.controller.clone()));

    let (status, body) = send(&app, "POST", "/session/mute", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["muted"], true);

    let (_, voices) = send(&app, "GET", "/voices", None).await;
    assert!(voices
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["voiceId"] == "melissa"));

    let (status, body) = send(
        &app,
        "PUT",
        "/session/voice",
        Some(json!({ "voiceId": "melissa" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["voiceId"], "melissa");

    let (status, body) = send(
        &app,
        "PUT",
        "/session/voice",
        Some(json!({ "voiceId": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn test_history_endpoints() {
    let h = harness();
    let app = create_router(AppState::new(h.controller.clone()));

    let (_, body) = send(&app, "GET", "/conversations", None).await;
    assert!(body.as_array().unwrap().is_empty());

    h.controller.start().await.unwrap();
    h.controller.handle_event(final_text("assistant", "A dragon")).await;
    h.controller.handle_event(final_text("user", "Yes!")).await;
    let saved = h.controller.stop().await.unwrap().unwrap();

    let (_, body) = send(&app, "GET", "/conversations", None).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], saved.id.as_str());
    assert_eq!(list[0]["title"], "Sona Session #1");
    assert_eq!(list[0]["duration"], "< 1 min");
    assert_eq!(list[0]["messageCount"], 2);

    let uri = format!("/conversations/{}", saved.id);
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interview"][0]["text"], "A dragon");

    let (status, _) = send(&app, "GET", "/conversations/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", &format!("{}/view", uri), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["viewing"]["id"], saved.id.as_str());

    let (_, body) = send(&app, "POST", "/session/live", None).await;
    assert!(body["viewing"].is_null());
}
