use std::time::Duration;

use log::info;

use crate::config::AppConfig;
use crate::model::{CookingTime, Cuisine, MealTime, RequestParameters, SuggestOutcome, MIN_COUNT};
use crate::providers::{LlmProvider, ProviderFactory};
use crate::{suggest_meals_with_provider, SuggestError};

/// Builder for configuring and executing a suggestion request
#[derive(Default)]
pub struct MealPlannerBuilder {
    meal_time: MealTime,
    cuisine: Cuisine,
    count: Option<u8>,
    cooking_time: CookingTime,
    provider: Option<Box<dyn LlmProvider>>,
    api_key: Option<String>,
    model: Option<String>,
    relay_url: Option<String>,
    timeout: Option<Duration>,
}

impl MealPlannerBuilder {
    /// Set the meal of the day (defaults to dinner)
    pub fn meal_time(mut self, meal_time: MealTime) -> Self {
        self.meal_time = meal_time;
        self
    }

    /// Set the cuisine (defaults to Japanese)
    pub fn cuisine(mut self, cuisine: Cuisine) -> Self {
        self.cuisine = cuisine;
        self
    }

    /// Set how many dishes to ask for, 1 to 5 (defaults to 1)
    pub fn count(mut self, count: u8) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the cooking-time ceiling (defaults to unspecified)
    pub fn cooking_time(mut self, cooking_time: CookingTime) -> Self {
        self.cooking_time = cooking_time;
        self
    }

    /// Use an explicit provider instead of one built from configuration
    ///
    /// # Example
    /// ```
    /// use kondate::{MealPlanner, ProviderFactory, ProviderConfig};
    ///
    /// let config = ProviderConfig {
    ///     api_key: Some("your-api-key".to_string()),
    ///     ..ProviderConfig::default()
    /// };
    /// let provider = ProviderFactory::create("google", &config).unwrap();
    /// let builder = MealPlanner::builder().provider(provider);
    /// ```
    pub fn provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the text service
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the text service
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Send the prompt through a relay instead of calling the service directly
    pub fn relay_url(mut self, url: impl Into<String>) -> Self {
        self.relay_url = Some(url.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Validate the chosen parameters without sending anything
    pub fn parameters(&self) -> Result<RequestParameters, SuggestError> {
        RequestParameters::new(
            self.meal_time,
            self.cuisine,
            self.count.unwrap_or(MIN_COUNT),
            self.cooking_time,
        )
    }

    /// Build and execute the suggestion request
    ///
    /// # Errors
    /// Returns `SuggestError` if:
    /// - The count is outside 1..=5
    /// - No API key or relay is available
    /// - The text service call fails
    ///
    /// An answer from which nothing could be extracted is not an error; it
    /// comes back as [`SuggestOutcome::NoMatch`].
    ///
    /// # Example
    /// ```no_run
    /// # use kondate::{MealPlanner, MealTime};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let outcome = MealPlanner::builder()
    ///     .meal_time(MealTime::Lunch)
    ///     .count(3)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<SuggestOutcome, SuggestError> {
        let params = self.parameters()?;

        let provider = match self.provider.take() {
            Some(provider) => provider,
            None => self.provider_from_config()?,
        };

        info!("Requesting suggestions via {}", provider.provider_name());
        suggest_meals_with_provider(&params, provider.as_ref()).await
    }

    fn provider_from_config(&self) -> Result<Box<dyn LlmProvider>, SuggestError> {
        let mut config = AppConfig::load()?;

        if let Some(key) = &self.api_key {
            config.provider.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config.provider.model = model.clone();
        }
        if let Some(timeout) = self.timeout {
            config.provider.timeout = timeout.as_secs().max(1);
        }
        if let Some(url) = &self.relay_url {
            config.provider.relay_url = Some(url.clone());
            config.default_provider = "relay".to_string();
        }

        ProviderFactory::get_default_provider(&config)
    }
}

/// Main entry point for the builder API
pub struct MealPlanner;

impl MealPlanner {
    /// Creates a new builder for a suggestion request
    ///
    /// # Example
    /// ```
    /// use kondate::MealPlanner;
    ///
    /// let builder = MealPlanner::builder();
    /// ```
    pub fn builder() -> MealPlannerBuilder {
        MealPlannerBuilder::default()
    }
}
