mod factory;
mod google;
mod relay;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use relay::RelayProvider;

use crate::error::SuggestError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Unified trait for text-generation backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "relay")
    fn provider_name(&self) -> &str;

    /// Send one prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, SuggestError>;
}

fn http_client(timeout_secs: u64) -> Result<Client, SuggestError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}
