use crate::config::ProviderConfig;
use crate::error::{SuggestError, UpstreamErrorKind};
use crate::providers::{http_client, LlmProvider};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelaySuccess {
    suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelayFailure {
    message: Option<String>,
}

/// Sends prompts through a kondate relay (see [`crate::server`]) instead of
/// calling the text service directly.
pub struct RelayProvider {
    client: Client,
    url: String,
}

impl RelayProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, SuggestError> {
        let url = config.relay_url.clone().ok_or_else(|| {
            SuggestError::InvalidParameter("relay_url is required for the relay provider".into())
        })?;

        Ok(RelayProvider {
            client: http_client(config.timeout)?,
            url,
        })
    }
}

#[async_trait]
impl LlmProvider for RelayProvider {
    fn provider_name(&self) -> &str {
        "relay"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SuggestError> {
        debug!("Posting prompt to relay {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest { prompt })
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            // The relay already turned the failure into a user-facing message.
            let message = response
                .json::<RelayFailure>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Relay returned {}", status));
            error!("Relay request failed with {}: {}", status, message);

            return Err(SuggestError::Upstream {
                kind: UpstreamErrorKind::Other,
                message,
            });
        }

        let body: RelaySuccess = response.json().await?;
        body.suggestion
            .ok_or(SuggestError::EmptyResponse {
                finish_reason: None,
            })
    }
}
