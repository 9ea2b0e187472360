use crate::config::ProviderConfig;
use crate::error::{SuggestError, UpstreamErrorKind};
use crate::providers::{http_client, LlmProvider};
use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, SuggestError> {
        // Try config first, then fall back to environment variables
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(SuggestError::MissingApiKey)?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(GoogleProvider {
            client: http_client(config.timeout)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SuggestError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!("Generating content with model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": {
                    "temperature": self.temperature,
                    "maxOutputTokens": self.max_tokens
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body: Value = response.json().await.unwrap_or(Value::Null);
            debug!("{:?}", error_body);
            let err = upstream_error(status, &error_body);
            error!("Gemini API returned {}: {}", status, err);
            return Err(err);
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        extract_text(&response_body)
    }
}

fn upstream_error(status: StatusCode, body: &Value) -> SuggestError {
    let message = body["error"]["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SuggestError::Upstream {
            kind: UpstreamErrorKind::InvalidCredential,
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => SuggestError::Upstream {
            kind: UpstreamErrorKind::QuotaExceeded,
            message,
        },
        _ => SuggestError::upstream(message),
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &Value) -> Result<String, SuggestError> {
    let candidate = &body["candidates"][0];

    let text = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    if let Some(text) = text {
        debug!("Generated response length: {}", text.len());
        return Ok(text);
    }

    let finish_reason = candidate["finishReason"].as_str().map(String::from);

    if let Some(block_reason) = body["promptFeedback"]["blockReason"].as_str() {
        warn!("Prompt blocked by safety policy: {}", block_reason);
        return Err(SuggestError::Blocked {
            reason: Some(block_reason.to_string()),
        });
    }

    if finish_reason.as_deref() == Some("SAFETY") {
        warn!("Response blocked by safety policy");
        return Err(SuggestError::Blocked {
            reason: finish_reason,
        });
    }

    error!("Gemini API returned no text in response: {}", body);
    Err(SuggestError::EmptyResponse { finish_reason })
}
