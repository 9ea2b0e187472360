use std::fmt;
use thiserror::Error;

const MISSING_API_KEY_MESSAGE: &str = "APIキーがサーバーに設定されていません。";
const MISSING_PROMPT_MESSAGE: &str = "プロンプトがリクエストに含まれていません。";
const INVALID_CREDENTIAL_MESSAGE: &str =
    "サーバーに設定されたAPIキーが無効か、権限がありません。管理者に連絡してください。";
const QUOTA_EXCEEDED_MESSAGE: &str =
    "APIの利用上限に達した可能性があります。時間をおいて再度お試しください。";
const NETWORK_MESSAGE: &str = "AIサービスへのネットワーク接続に失敗しました。インターネット接続を確認するか、時間をおいて再度お試しください。";
const NO_TEXT_MESSAGE: &str = "AIからの応答にテキストが含まれていませんでした。";
const GENERIC_UPSTREAM_MESSAGE: &str = "AIとの通信中にサーバーでエラーが発生しました。";

/// Errors that can occur while requesting meal suggestions
#[derive(Error, Debug)]
pub enum SuggestError {
    /// No API key was configured for the text service
    #[error("API key is not configured")]
    MissingApiKey,

    /// The relay received a request without a prompt
    #[error("Prompt is missing from the request")]
    MissingPrompt,

    /// A request parameter is outside its allowed domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The text service answered with an error
    #[error("Upstream {kind} error: {message}")]
    Upstream {
        kind: UpstreamErrorKind,
        message: String,
    },

    /// The text service refused to answer because of its safety policy
    #[error("Response blocked by safety policy{}", reason_suffix(.reason))]
    Blocked { reason: Option<String> },

    /// The text service answered without any text
    #[error("Response contained no text{}", reason_suffix(.finish_reason))]
    EmptyResponse { finish_reason: Option<String> },

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" ({})", reason),
        None => String::new(),
    }
}

/// Subcategory of a failed call to the text service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    InvalidCredential,
    QuotaExceeded,
    Network,
    Other,
}

impl fmt::Display for UpstreamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamErrorKind::InvalidCredential => "credential",
            UpstreamErrorKind::QuotaExceeded => "quota",
            UpstreamErrorKind::Network => "network",
            UpstreamErrorKind::Other => "service",
        };
        f.write_str(name)
    }
}

/// Top-level category used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    InvalidCredential,
    QuotaExceeded,
    Network,
    SafetyBlocked,
    Upstream,
}

/// Classify an upstream error message by its content.
pub fn classify_upstream_message(message: &str) -> UpstreamErrorKind {
    let lower = message.to_lowercase();

    if lower.contains("api key not valid")
        || lower.contains("permission denied")
        || lower.contains("authentication failed")
    {
        UpstreamErrorKind::InvalidCredential
    } else if lower.contains("quota") {
        UpstreamErrorKind::QuotaExceeded
    } else if lower.contains("failed to fetch") || lower.contains("network error") {
        UpstreamErrorKind::Network
    } else {
        UpstreamErrorKind::Other
    }
}

impl SuggestError {
    /// Build an upstream error, classifying it by message content.
    pub fn upstream(message: impl Into<String>) -> Self {
        let message = message.into();
        SuggestError::Upstream {
            kind: classify_upstream_message(&message),
            message,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SuggestError::MissingApiKey | SuggestError::Config(_) => ErrorCategory::Configuration,
            SuggestError::MissingPrompt | SuggestError::InvalidParameter(_) => ErrorCategory::Input,
            SuggestError::Upstream { kind, .. } => match kind {
                UpstreamErrorKind::InvalidCredential => ErrorCategory::InvalidCredential,
                UpstreamErrorKind::QuotaExceeded => ErrorCategory::QuotaExceeded,
                UpstreamErrorKind::Network => ErrorCategory::Network,
                UpstreamErrorKind::Other => ErrorCategory::Upstream,
            },
            SuggestError::Blocked { .. } => ErrorCategory::SafetyBlocked,
            SuggestError::EmptyResponse { .. } => ErrorCategory::Upstream,
            SuggestError::Http(e) if e.is_connect() || e.is_timeout() => ErrorCategory::Network,
            SuggestError::Http(e) => {
                match classify_upstream_message(&e.to_string()) {
                    UpstreamErrorKind::Network => ErrorCategory::Network,
                    _ => ErrorCategory::Upstream,
                }
            }
        }
    }

    /// The single message shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            SuggestError::MissingApiKey => MISSING_API_KEY_MESSAGE.to_string(),
            SuggestError::Config(e) => format!("設定の読み込みに失敗しました: {}", e),
            SuggestError::MissingPrompt => MISSING_PROMPT_MESSAGE.to_string(),
            SuggestError::InvalidParameter(detail) => format!("入力が不正です: {}", detail),
            SuggestError::Blocked { reason }
            | SuggestError::EmptyResponse {
                finish_reason: reason,
            } => match reason {
                Some(reason) => format!("{} Finish reason: {}.", NO_TEXT_MESSAGE, reason),
                None => NO_TEXT_MESSAGE.to_string(),
            },
            SuggestError::Upstream { message, .. } => match self.category() {
                ErrorCategory::InvalidCredential => INVALID_CREDENTIAL_MESSAGE.to_string(),
                ErrorCategory::QuotaExceeded => QUOTA_EXCEEDED_MESSAGE.to_string(),
                ErrorCategory::Network => NETWORK_MESSAGE.to_string(),
                _ if message.trim().is_empty() => GENERIC_UPSTREAM_MESSAGE.to_string(),
                _ => message.clone(),
            },
            SuggestError::Http(_) => match self.category() {
                ErrorCategory::Network => NETWORK_MESSAGE.to_string(),
                _ => GENERIC_UPSTREAM_MESSAGE.to_string(),
            },
        }
    }
}
