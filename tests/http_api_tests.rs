// Integration tests for the HTTP control API
//
// The router is driven in-process via tower's oneshot, with in-memory
// services behind it.

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::Engine;
use livecast::services::{
    CollectingNotifier, LogJobDispatcher, MemoryObjectStore, MemoryRecordingStore, Services,
};
use livecast::{create_router, AppState, SessionDefaults};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

fn test_router(media_dir: &TempDir) -> Router {
    let services = Arc::new(Services {
        objects: Arc::new(MemoryObjectStore::new()),
        recordings: Arc::new(MemoryRecordingStore::new()),
        jobs: Arc::new(LogJobDispatcher::new()),
        notifier: Arc::new(CollectingNotifier::new()),
    });

    let state = AppState::new(services, SessionDefaults::default());
    create_router(state, media_dir.path().to_path_buf())
}

async fn request(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

fn encoded_chunk(bytes: usize) -> String {
    base64::engine::general_purpose::STANDARD.encode(vec![1u8; bytes])
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (status, body) = request(&router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_create_session_starts_in_setup() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (status, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "setup");
    assert!(body["session_id"].as_str().unwrap().starts_with("live-"));

    Ok(())
}

#[tokio::test]
async fn test_unknown_session_is_404() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (status, _) = request(&router, Method::GET, "/sessions/live-nope/status", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_full_session_flow_over_http() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    // Create an event-scoped session
    let (status, body) = request(
        &router,
        Method::POST,
        "/sessions",
        Some(json!({
            "event_id": "event-9",
            "user_id": "user-1",
            "display_name": "Dana",
            "viewer_seed": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // Preview
    let (status, body) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/preview", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "preview");

    // Go live
    let (status, body) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/live", session_id),
        Some(json!({"title": "Launch stream", "description": "Q&A"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "live");

    // Push two chunks
    for timestamp_ms in [1000u64, 2000] {
        let (status, body) = request(
            &router,
            Method::POST,
            &format!("/sessions/{}/chunks", session_id),
            Some(json!({"data": encoded_chunk(512), "timestamp_ms": timestamp_ms})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["accepted"], true);
    }

    // Chat
    let (status, body) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/chat", session_id),
        Some(json!({"content": "hello everyone"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"], "Dana");

    let (status, body) = request(
        &router,
        Method::GET,
        &format!("/sessions/{}/chat", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // End the stream
    let (status, body) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/end", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ended");

    // The recording was registered
    let (status, body) = request(&router, Method::GET, "/recordings", None).await;
    assert_eq!(status, StatusCode::OK);
    let recordings = body.as_array().unwrap();
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0]["event_id"], "event-9");
    assert_eq!(recordings[0]["status"], "processing");
    assert_eq!(recordings[0]["file_size_bytes"], 1024);

    Ok(())
}

#[tokio::test]
async fn test_chunks_rejected_unless_live() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (_, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    request(
        &router,
        Method::POST,
        &format!("/sessions/{}/preview", session_id),
        None,
    )
    .await;

    let (status, _) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/chunks", session_id),
        Some(json!({"data": encoded_chunk(16), "timestamp_ms": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn test_invalid_chunk_encoding_is_bad_request() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (_, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    request(
        &router,
        Method::POST,
        &format!("/sessions/{}/preview", session_id),
        None,
    )
    .await;
    request(
        &router,
        Method::POST,
        &format!("/sessions/{}/live", session_id),
        Some(json!({"title": "Bad chunks"})),
    )
    .await;

    let (status, _) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/chunks", session_id),
        Some(json!({"data": "not-base64!!!", "timestamp_ms": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_blank_chat_message_is_dropped() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (_, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/chat", session_id),
        Some(json!({"content": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = request(
        &router,
        Method::GET,
        &format!("/sessions/{}/chat", session_id),
        None,
    )
    .await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_go_live_without_title_is_unprocessable() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (_, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    request(
        &router,
        Method::POST,
        &format!("/sessions/{}/preview", session_id),
        None,
    )
    .await;

    let (status, _) = request(
        &router,
        Method::POST,
        &format!("/sessions/{}/live", session_id),
        Some(json!({"title": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Still previewing, not live
    let (_, body) = request(
        &router,
        Method::GET,
        &format!("/sessions/{}/status", session_id),
        None,
    )
    .await;
    assert_eq!(body["status"], "preview");

    Ok(())
}

#[tokio::test]
async fn test_close_removes_the_session() -> Result<()> {
    let media_dir = TempDir::new()?;
    let router = test_router(&media_dir);

    let (_, body) = request(&router, Method::POST, "/sessions", Some(json!({}))).await;
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &router,
        Method::DELETE,
        &format!("/sessions/{}", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
        &router,
        Method::GET,
        &format!("/sessions/{}/status", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}
