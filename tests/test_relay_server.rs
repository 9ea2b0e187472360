use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use kondate::server::{
    self, HealthResponse, MessageResponse, RelayState, SuggestMealRequest, SuggestMealResponse,
};
use kondate::{LlmProvider, ProviderConfig, ProviderFactory, SuggestError};
use serde::de::DeserializeOwned;

/// Provider that answers every prompt with a fixed result
struct StubProvider {
    reply: Result<String, String>,
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, SuggestError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(SuggestError::upstream(message.clone())),
        }
    }
}

fn state_with(reply: Result<&str, &str>) -> RelayState {
    RelayState::new(Arc::new(StubProvider {
        reply: reply.map(String::from).map_err(String::from),
    }))
}

fn request(prompt: Option<&str>) -> Result<Json<SuggestMealRequest>, JsonRejection> {
    Ok(Json(SuggestMealRequest {
        prompt: prompt.map(String::from),
    }))
}

/// Serve the relay router on an ephemeral port and return its address
async fn spawn_relay(state: RelayState) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn body_json<T: DeserializeOwned>(response: Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let Json(health) = server::health().await;
    assert_eq!(health.status, "OK");
    assert_eq!(health.message, "AI Suggestion API is running.");
}

#[tokio::test]
async fn test_suggest_meal_success() {
    let state = state_with(Ok("料理名：味噌汁\n説明：和風の汁物。"));
    let response = server::suggest_meal(State(state), request(Some("prompt"))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: SuggestMealResponse = body_json(response).await;
    assert_eq!(body.suggestion, "料理名：味噌汁\n説明：和風の汁物。");
}

#[tokio::test]
async fn test_missing_prompt_is_bad_request() {
    let state = state_with(Ok("unused"));

    for prompt in [None, Some(""), Some("   ")] {
        let response = server::suggest_meal(State(state.clone()), request(prompt)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: MessageResponse = body_json(response).await;
        assert_eq!(body.message, "プロンプトがリクエストに含まれていません。");
    }
}

#[tokio::test]
async fn test_unconfigured_relay_reports_missing_key() {
    let response =
        server::suggest_meal(State(RelayState::unconfigured()), request(Some("prompt"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = body_json(response).await;
    assert_eq!(body.message, "APIキーがサーバーに設定されていません。");
}

#[tokio::test]
async fn test_upstream_failure_is_mapped_to_user_message() {
    let state = state_with(Err("Quota exceeded for requests per minute"));
    let response = server::suggest_meal(State(state), request(Some("prompt"))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = body_json(response).await;
    assert_eq!(
        body.message,
        "APIの利用上限に達した可能性があります。時間をおいて再度お試しください。"
    );
}

#[tokio::test]
async fn test_relay_provider_round_trip() {
    let addr = spawn_relay(state_with(Ok("料理名：餃子\n説明：焼き餃子です。"))).await;
    let url = format!("http://{}{}", addr, server::SUGGEST_MEAL_PATH);

    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "OK");

    let config = ProviderConfig {
        relay_url: Some(url),
        ..ProviderConfig::default()
    };
    let provider = ProviderFactory::create("relay", &config).unwrap();

    let text = provider.generate("prompt").await.unwrap();
    assert_eq!(text, "料理名：餃子\n説明：焼き餃子です。");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request_with_message() {
    let addr = spawn_relay(state_with(Ok("unused"))).await;
    let url = format!("http://{}{}", addr, server::SUGGEST_MEAL_PATH);
    let client = reqwest::Client::new();

    let requests = [
        client.post(&url),
        client
            .post(&url)
            .header("content-type", "application/json")
            .body("not json"),
        client
            .post(&url)
            .header("content-type", "application/json")
            .body(r#"{"prompt": 5}"#),
    ];

    for request in requests {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: MessageResponse = response.json().await.unwrap();
        assert_eq!(body.message, "プロンプトがリクエストに含まれていません。");
    }
}

#[tokio::test]
async fn test_relay_provider_surfaces_relay_message() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/api/suggestMeal")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "APIキーがサーバーに設定されていません。"}"#)
        .create_async()
        .await;

    let config = ProviderConfig {
        relay_url: Some(format!("{}/api/suggestMeal", server.url())),
        ..ProviderConfig::default()
    };
    let provider = ProviderFactory::create("relay", &config).unwrap();

    let err = provider.generate("prompt").await.unwrap_err();
    assert_eq!(err.user_message(), "APIキーがサーバーに設定されていません。");
}
