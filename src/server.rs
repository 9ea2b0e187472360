//! HTTP relay between a browser front end and the text service.
//!
//! Keeps the API key on the server: clients post a finished prompt and get
//! the raw model text back, or a single user-facing error message.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::SuggestError;
use crate::providers::{LlmProvider, ProviderFactory};

/// Path the relay listens on for both the health check and suggestions
pub const SUGGEST_MEAL_PATH: &str = "/api/suggestMeal";

/// Shared state for all handlers
#[derive(Clone)]
pub struct RelayState {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl RelayState {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// State for a relay whose text service has no API key configured.
    ///
    /// Every suggestion request is answered with a configuration error.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    /// Build the state from configuration; a missing API key is not fatal
    /// at startup.
    pub fn from_config(config: &AppConfig) -> Result<Self, SuggestError> {
        match ProviderFactory::get_default_provider(config) {
            Ok(provider) => Ok(Self::new(Arc::from(provider))),
            Err(SuggestError::MissingApiKey) => {
                warn!("API key is not set; suggestion requests will fail until it is configured");
                Ok(Self::unconfigured())
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestMealRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestMealResponse {
    pub suggestion: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Returns the relay router
pub fn router(state: RelayState) -> Router {
    Router::new()
        .route(SUGGEST_MEAL_PATH, get(health).post(suggest_meal))
        .with_state(state)
}

/// Static health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "AI Suggestion API is running.".to_string(),
    })
}

/// Forward a prompt to the text service and return its raw answer
pub async fn suggest_meal(
    State(state): State<RelayState>,
    payload: Result<Json<SuggestMealRequest>, JsonRejection>,
) -> Response {
    let Some(provider) = state.provider else {
        error!("API key is not set for the relay");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &SuggestError::MissingApiKey);
    };

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, &SuggestError::MissingPrompt);
        }
    };

    let prompt = match request.prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => return error_response(StatusCode::BAD_REQUEST, &SuggestError::MissingPrompt),
    };

    match provider.generate(&prompt).await {
        Ok(suggestion) => {
            info!("Relayed suggestion of {} bytes", suggestion.len());
            (StatusCode::OK, Json(SuggestMealResponse { suggestion })).into_response()
        }
        Err(e) => {
            error!("Text service call failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}

fn error_response(status: StatusCode, err: &SuggestError) -> Response {
    (
        status,
        Json(MessageResponse {
            message: err.user_message(),
        }),
    )
        .into_response()
}

/// Bind the configured address and serve the relay until the process exits
pub async fn serve(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = RelayState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Relay listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
