pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod server;

use log::{debug, info};

pub use builder::{MealPlanner, MealPlannerBuilder};
pub use crate::config::{AppConfig, ProviderConfig, ServerConfig};
pub use error::{ErrorCategory, SuggestError, UpstreamErrorKind};
pub use model::{CookingTime, Cuisine, MealTime, RequestParameters, SuggestOutcome, Suggestion};
pub use parser::{extract_one, parse_suggestions};
pub use prompt::build_prompt;
pub use providers::{LlmProvider, ProviderFactory};

/// Request suggestions using the provider from the loaded configuration.
///
/// # Example
/// ```no_run
/// use kondate::{suggest_meals, CookingTime, Cuisine, MealTime, RequestParameters};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let params =
///     RequestParameters::new(MealTime::Dinner, Cuisine::Western, 2, CookingTime::Within30)?;
/// let outcome = suggest_meals(&params).await?;
/// for suggestion in outcome.suggestions() {
///     println!("{}: {}", suggestion.name, suggestion.description);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn suggest_meals(params: &RequestParameters) -> Result<SuggestOutcome, SuggestError> {
    let config = AppConfig::load()?;
    let provider = ProviderFactory::get_default_provider(&config)?;
    suggest_meals_with_provider(params, provider.as_ref()).await
}

/// Build the prompt, send it once through `provider` and parse the answer.
pub async fn suggest_meals_with_provider(
    params: &RequestParameters,
    provider: &dyn LlmProvider,
) -> Result<SuggestOutcome, SuggestError> {
    let prompt = build_prompt(params);
    debug!("Prompt length: {}", prompt.len());

    let raw = provider.generate(&prompt).await?;
    let suggestions = parse_suggestions(&raw);
    info!(
        "Parsed {} of {} requested suggestions",
        suggestions.len(),
        params.count()
    );

    Ok(SuggestOutcome::from_suggestions(suggestions))
}
