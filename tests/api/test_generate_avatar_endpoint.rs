// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the POST / avatar generation endpoint
//!
//! These tests verify:
//! - CORS preflight short-circuits with the permissive header set
//! - Non-POST methods get the JSON 405
//! - Missing/invalid fields and unparseable bodies get a 400, no upstream call
//! - A node without a credential fails fast with a 500 configuration error
//! - The full success path round-trips the generated image as a data URL
//! - Exhausted upstream rate limiting surfaces as 429 with RATE_LIMIT_ERROR

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use fabstir_avatar_node::api::http_server::{create_app, AppState};
use fabstir_avatar_node::config::GeminiConfig;
use fabstir_avatar_node::gemini::{GeminiClient, RetryPolicy};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

/// Helper: app with no upstream credential configured
fn app_without_client() -> Router {
    create_app(AppState::new(None))
}

/// Helper: app whose Gemini client points at a local mock upstream
fn app_with_mock_upstream(base_url: &str) -> Router {
    let config = GeminiConfig {
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    let client = GeminiClient::new(&config)
        .unwrap()
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 10,
            max_jitter_ms: 5,
        });
    create_app(AppState::new(Some(Arc::new(client))))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// --- Mock upstream ---

#[derive(Clone, Copy)]
enum MockMode {
    Success,
    AlwaysRateLimited,
    TextOnly,
}

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    mode: MockMode,
}

async fn mock_upstream_handler(State(state): State<MockState>) -> axum::response::Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.mode {
        MockMode::Success => Json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{
                    "inlineData": {
                        "mimeType": "image/png",
                        "data": STANDARD.encode(PNG_BYTES)
                    }
                }]}
            }]
        }))
        .into_response(),
        MockMode::AlwaysRateLimited => {
            (StatusCode::TOO_MANY_REQUESTS, "quota exceeded").into_response()
        }
        MockMode::TextOnly => Json(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I cannot generate this image." }]}
            }]
        }))
        .into_response(),
    }
}

async fn spawn_mock_upstream(mode: MockMode) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        hits: hits.clone(),
        mode,
    };
    let app = Router::new()
        .fallback(mock_upstream_handler)
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

// --- Tests ---

#[tokio::test]
async fn test_options_preflight_returns_200_with_cors_headers() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app_without_client().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
    let allow_methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allow_methods.contains("POST"));
    assert!(allow_methods.contains("OPTIONS"));
    let allow_headers = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allow_headers.to_lowercase().contains("content-type"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_get_returns_405_json() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app_without_client().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn test_missing_fields_returns_400() {
    let response = app_without_client()
        .oneshot(post_json("{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("imageBase64"));
    assert!(error.contains("animeTitle"));
}

#[tokio::test]
async fn test_missing_title_returns_400() {
    let response = app_without_client()
        .oneshot(post_json(r#"{"imageBase64": "aGVsbG8="}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_body_treated_as_empty_object() {
    let response = app_without_client()
        .oneshot(post_json("this is {not valid json"))
        .await
        .unwrap();

    // Same classification as a body with absent fields, never a 422/500
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("imageBase64"));
}

#[tokio::test]
async fn test_invalid_image_base64_returns_400() {
    let response = app_without_client()
        .oneshot(post_json(
            r#"{"imageBase64": "!!!not-base64!!!", "animeTitle": "Naruto"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid imageBase64");
}

#[tokio::test]
async fn test_missing_credential_returns_500_configuration_error() {
    let response = app_without_client()
        .oneshot(post_json(
            r#"{"imageBase64": "aGVsbG8=", "animeTitle": "Naruto"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_success_round_trips_generated_image_as_data_url() {
    let (base_url, hits) = spawn_mock_upstream(MockMode::Success).await;
    let selfie = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"selfie"));
    let body = serde_json::json!({
        "imageBase64": selfie,
        "animeTitle": "Attack on Titan",
        "animeCharacter": "Mikasa"
    });

    let response = app_with_mock_upstream(&base_url)
        .oneshot(post_json(&body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["image"]["mimeType"], "image/png");

    let data_url = json["image"]["dataUrl"].as_str().unwrap();
    let expected = format!("data:image/png;base64,{}", STANDARD.encode(PNG_BYTES));
    assert_eq!(data_url, expected);

    // Re-decoding the returned data URL reproduces the upstream bytes
    let payload = data_url.split_once(',').unwrap().1;
    assert_eq!(STANDARD.decode(payload).unwrap(), PNG_BYTES);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_exhausted_rate_limit_returns_429_with_error_code() {
    let (base_url, hits) = spawn_mock_upstream(MockMode::AlwaysRateLimited).await;

    let response = app_with_mock_upstream(&base_url)
        .oneshot(post_json(
            r#"{"imageBase64": "aGVsbG8=", "animeTitle": "Naruto"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], "RATE_LIMIT_ERROR");
    // All attempts were spent against the upstream
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_text_only_upstream_response_surfaces_model_text() {
    let (base_url, _hits) = spawn_mock_upstream(MockMode::TextOnly).await;

    let response = app_with_mock_upstream(&base_url)
        .oneshot(post_json(
            r#"{"imageBase64": "aGVsbG8=", "animeTitle": "Naruto"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("cannot generate"));
}

#[tokio::test]
async fn test_validation_failure_makes_no_upstream_call() {
    let (base_url, hits) = spawn_mock_upstream(MockMode::Success).await;

    let response = app_with_mock_upstream(&base_url)
        .oneshot(post_json(r#"{"animeTitle": "Naruto"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
