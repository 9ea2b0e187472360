use crate::config::{AppConfig, ProviderConfig};
use crate::error::SuggestError;
use crate::providers::{GoogleProvider, LlmProvider, RelayProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, SuggestError> {
        match provider_name {
            "google" => Ok(Box::new(GoogleProvider::new(config)?)),
            "relay" => Ok(Box::new(RelayProvider::new(config)?)),
            _ => Err(SuggestError::InvalidParameter(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, SuggestError> {
        Self::create(&config.default_provider, &config.provider)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "relay"]
    }
}
