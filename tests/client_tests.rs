//! The Messages API client against a local server standing in for the provider.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use reframe::{
    Anthropic, ErrorKind, HostedModel, Model, ModelClient, PromptComposer, ProviderFailure,
};

#[derive(Clone, Default)]
struct Seen {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/")
}

async fn reply_ok(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.requests.lock().push((headers, body));
    Json(json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-haiku-4-5",
        "content": [
            {"type": "text", "text": "You're being "},
            {"type": "text", "text": "hard on yourself."}
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 20, "output_tokens": 8}
    }))
}

fn hosted(base_url: String) -> HostedModel {
    let client = Anthropic::with_options("sk-test", Some(base_url), None).unwrap();
    HostedModel::new(client, Model::default())
}

#[tokio::test]
async fn generate_sends_prompt_and_joins_text() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/v1/messages", post(reply_ok))
        .with_state(seen.clone());
    let model = hosted(spawn(router).await);

    let prompt = PromptComposer::cbt().compose("I always mess things up.");
    let text = model.generate(&prompt).await.unwrap();
    assert_eq!(text, "You're being hard on yourself.");

    let requests = seen.requests.lock();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers.get("x-api-key").unwrap(), "sk-test");
    assert_eq!(headers.get("anthropic-version").unwrap(), "2023-06-01");
    assert_eq!(body["model"], "claude-haiku-4-5");
    assert_eq!(body["system"], prompt.system.as_str());
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "I always mess things up."}])
    );
    let temperature = body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn rejected_credential_is_authentication_error() {
    let router = Router::new().route(
        "/v1/messages",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "type": "error",
                    "error": {"type": "authentication_error", "message": "invalid x-api-key"}
                })),
            )
        }),
    );
    let model = hosted(spawn(router).await);
    let err = model
        .generate(&PromptComposer::cbt().compose("Nobody likes me."))
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(ProviderFailure::Rejected), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(
        err.to_string(),
        "the provider did not accept the API key (HTTP 401): \
         authentication_error: invalid x-api-key"
    );
}

#[tokio::test]
async fn overload_is_service_unavailable() {
    let router = Router::new().route(
        "/v1/messages",
        post(|| async {
            (
                StatusCode::from_u16(529).unwrap(),
                Json(json!({
                    "type": "error",
                    "error": {"type": "overloaded_error", "message": "Overloaded"}
                })),
            )
        }),
    );
    let model = hosted(spawn(router).await);
    let err = model
        .generate(&PromptComposer::cbt().compose("Nobody likes me."))
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(ProviderFailure::Unavailable), "{err:?}");
}

#[tokio::test]
async fn malformed_response_is_serialization_error() {
    let router = Router::new().route(
        "/v1/messages",
        post(|| async { Json(json!({"unexpected": true})) }),
    );
    let model = hosted(spawn(router).await);
    let err = model
        .generate(&PromptComposer::cbt().compose("Nobody likes me."))
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(ProviderFailure::Malformed), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Provider);
}

#[tokio::test]
async fn reply_without_text_is_an_error() {
    let router = Router::new().route(
        "/v1/messages",
        post(|| async {
            Json(json!({
                "id": "msg_empty",
                "type": "message",
                "role": "assistant",
                "model": "claude-haiku-4-5",
                "content": [],
                "usage": {"input_tokens": 20, "output_tokens": 0}
            }))
        }),
    );
    let model = hosted(spawn(router).await);
    let err = model
        .generate(&PromptComposer::cbt().compose("Nobody likes me."))
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(ProviderFailure::Malformed), "{err:?}");
}

#[tokio::test]
async fn unreachable_provider_is_provider_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let model = hosted(format!("http://{addr}/v1/"));
    let err = model
        .generate(&PromptComposer::cbt().compose("Nobody likes me."))
        .await
        .unwrap_err();
    assert_eq!(err.failure(), Some(ProviderFailure::Unreachable), "{err:?}");
    let shown = err.to_string();
    assert_eq!(shown.matches("could not reach the provider").count(), 1, "{shown}");
    assert!(!shown.contains("Connection error"), "{shown}");
}
