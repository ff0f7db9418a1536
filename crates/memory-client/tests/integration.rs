//! Integration tests: drive the real client against a stub memory service.

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use memory_client::MemoryClient;
use memory_types::{EntityInput, MemoryApi, MemoryApiError, ObservationInput};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Stub service: POST handlers echo the body they received, GET handlers echo
/// the decoded path/query parameter. Special values trigger failure modes.
fn stub_router() -> Router {
    Router::new()
        .route(
            "/memory/observation",
            post(|Json(body): Json<Value>| async move { Json(json!({"stored": body})) }),
        )
        .route(
            "/memory/entity",
            post(|Json(body): Json<Value>| async move { Json(json!({"created": body})) }),
        )
        .route("/memory/graph/:entity_name", get(graph))
        .route("/memory/search", get(search))
}

async fn graph(Path(entity_name): Path<String>, headers: HeaderMap) -> Response {
    match entity_name.as_str() {
        "Nobody" => (StatusCode::NOT_FOUND, "entity not found: Nobody").into_response(),
        "plain" => (StatusCode::OK, "this is not json").into_response(),
        _ => {
            let content_type = headers
                .get(axum::http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            Json(json!({
                "entity": entity_name,
                "relations": [],
                "content_type": content_type
            }))
            .into_response()
        }
    }
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    if q == "boom" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "search backend unavailable").into_response();
    }
    Json(json!({"query": q, "results": []})).into_response()
}

async fn spawn_stub() -> MemoryClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub_router().into_make_service())
            .await
            .unwrap();
    });
    MemoryClient::with_base_url(&format!("http://{addr}")).unwrap()
}

/// Client pointed at a port nothing listens on; any network attempt fails
/// with a transport error, so a MissingField result proves no call was made.
fn unreachable_client() -> MemoryClient {
    MemoryClient::with_base_url("http://127.0.0.1:9").unwrap()
}

#[tokio::test]
async fn observation_posts_payload_with_default_source() {
    let client = spawn_stub().await;
    let res = client
        .add_observation(&ObservationInput::new("Alice", "prefers espresso"))
        .await
        .unwrap();
    assert_eq!(
        res["stored"],
        json!({
            "entity_name": "Alice",
            "content": "prefers espresso",
            "source": "claude-skill"
        })
    );
}

#[tokio::test]
async fn observation_keeps_explicit_source() {
    let client = spawn_stub().await;
    let res = client
        .add_observation(&ObservationInput::new("Alice", "prefers espresso").with_source("importer"))
        .await
        .unwrap();
    assert_eq!(res["stored"]["source"], "importer");
}

#[tokio::test]
async fn entity_body_passes_extra_fields_through() {
    let client = spawn_stub().await;
    let input = EntityInput::new("Alice", "Person")
        .with_field("team", json!("storage"))
        .with_field("age", json!(30));
    let res = client.create_entity(&input).await.unwrap();
    assert_eq!(
        res["created"],
        json!({"name": "Alice", "type": "Person", "team": "storage", "age": 30})
    );
}

#[tokio::test]
async fn graph_entity_name_survives_reserved_characters() {
    let client = spawn_stub().await;
    let name = "Alice / Bob & Co?";
    let res = client.get_graph(name).await.unwrap();
    // a raw "/" would have produced an extra path segment and a 404
    assert_eq!(res["entity"], name);
}

#[tokio::test]
async fn search_query_survives_reserved_characters() {
    let client = spawn_stub().await;
    let query = "rust & memory / systems?";
    let res = client.search_entities(query).await.unwrap();
    assert_eq!(res["query"], query);
}

#[tokio::test]
async fn bodyless_requests_still_send_json_content_type() {
    let client = spawn_stub().await;
    let res = client.get_graph("Alice").await.unwrap();
    assert_eq!(res["content_type"], "application/json");
}

#[tokio::test]
async fn success_json_is_returned_unchanged() {
    let client = spawn_stub().await;
    let res = client.search_entities("alice").await.unwrap();
    assert_eq!(res, json!({"query": "alice", "results": []}));
}

#[tokio::test]
async fn missing_fields_fail_before_any_network_call() {
    let client = unreachable_client();

    let err = client
        .add_observation(&ObservationInput::new("", "content"))
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("entity_name")));

    let err = client
        .add_observation(&ObservationInput::new("Alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("content")));

    let err = client
        .create_entity(&EntityInput::new("", "Person"))
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("name")));

    let err = client
        .create_entity(&EntityInput::new("Alice", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("type")));

    let err = client.get_graph("").await.unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("entity_name")));

    let err = client.search_entities("").await.unwrap_err();
    assert!(matches!(err, MemoryApiError::MissingField("query")));
}

#[tokio::test]
async fn non_success_carries_status_and_body_text() {
    let client = spawn_stub().await;

    let err = client.get_graph("Nobody").await.unwrap_err();
    match &err {
        MemoryApiError::Status { status, body } => {
            assert_eq!(*status, 404);
            assert_eq!(body, "entity not found: Nobody");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("404"), "{msg}");
    assert!(msg.contains("entity not found"), "{msg}");

    let err = client.search_entities("boom").await.unwrap_err();
    match err {
        MemoryApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "search backend unavailable");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let client = spawn_stub().await;
    let err = client.get_graph("plain").await.unwrap_err();
    assert!(matches!(err, MemoryApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let client = unreachable_client();
    let err = client.search_entities("alice").await.unwrap_err();
    assert!(matches!(err, MemoryApiError::Transport(_)));
}
