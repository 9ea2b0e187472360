use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kondate::parser::{PLACEHOLDER_DESCRIPTION, PLACEHOLDER_NAME};
use kondate::prompt::SUGGESTION_DELIMITER;
use kondate::{
    suggest_meals_with_provider, CookingTime, Cuisine, LlmProvider, MealPlanner, MealTime,
    RequestParameters, SuggestError, SuggestOutcome,
};

/// Provider that records the prompt it receives and replies with canned text
struct RecordingProvider {
    reply: String,
    seen: Arc<Mutex<Vec<String>>>,
}

impl RecordingProvider {
    fn new(reply: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                reply: reply.to_string(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    fn provider_name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SuggestError> {
        self.seen.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, SuggestError> {
        Err(SuggestError::upstream("network error"))
    }
}

#[tokio::test]
async fn test_builder_sends_prompt_and_parses_reply() {
    let reply = format!(
        "料理名：ハンバーグ\n説明：ジューシーな洋食の定番。\n{}\n料理名：グラタン\n説明：チーズたっぷり。",
        SUGGESTION_DELIMITER
    );
    let (provider, seen) = RecordingProvider::new(&reply);

    let outcome = MealPlanner::builder()
        .meal_time(MealTime::Lunch)
        .cuisine(Cuisine::Western)
        .count(2)
        .cooking_time(CookingTime::Within30)
        .provider(Box::new(provider))
        .build()
        .await
        .unwrap();

    let names: Vec<&str> = outcome
        .suggestions()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["ハンバーグ", "グラタン"]);

    let prompts = seen.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("昼食"));
    assert!(prompts[0].contains("洋食"));
    assert!(prompts[0].contains("2品"));
    assert!(prompts[0].contains("30分以内"));
}

#[tokio::test]
async fn test_builder_rejects_count_before_calling_provider() {
    let (provider, seen) = RecordingProvider::new("unused");

    let result = MealPlanner::builder()
        .count(6)
        .provider(Box::new(provider))
        .build()
        .await;

    assert!(matches!(result, Err(SuggestError::InvalidParameter(_))));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unparseable_reply_is_no_match() {
    let (provider, _) = RecordingProvider::new("申し訳ありませんが、お手伝いできません。");

    let outcome = MealPlanner::builder()
        .provider(Box::new(provider))
        .build()
        .await
        .unwrap();

    assert_eq!(outcome, SuggestOutcome::NoMatch);
}

#[tokio::test]
async fn test_reply_without_delimiter_still_yields_suggestion() {
    let (provider, _) = RecordingProvider::new("\n\n料理名：肉じゃが\n説明：\n");
    let params = RequestParameters::default();

    let outcome = suggest_meals_with_provider(&params, &provider)
        .await
        .unwrap();

    let suggestions = outcome.suggestions();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "肉じゃが");
    assert_eq!(suggestions[0].description, PLACEHOLDER_DESCRIPTION);
    assert_ne!(suggestions[0].name, PLACEHOLDER_NAME);
}

#[tokio::test]
async fn test_provider_failure_is_propagated() {
    let params = RequestParameters::default();
    let err = suggest_meals_with_provider(&params, &FailingProvider)
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "AIサービスへのネットワーク接続に失敗しました。インターネット接続を確認するか、時間をおいて再度お試しください。"
    );
}

#[test]
fn test_builder_parameters_default() {
    let params = MealPlanner::builder().parameters().unwrap();
    assert_eq!(params, RequestParameters::default());
}
