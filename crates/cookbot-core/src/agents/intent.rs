use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{check_health, post_json};
use crate::collaborator::Collaborator;
use crate::config::DEFAULT_HEALTH_TIMEOUT_SECS;
use crate::error::Result;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    message: &'a str,
    youtube_url: &'a str,
}

/// What the classifier thinks the user wants.
///
/// Only `VIDEO` changes routing; `TEXT` and anything else go to the shopping agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Intent {
    Video,
    Text,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::Video => "VIDEO",
            Intent::Text => "TEXT",
            Intent::Other(other) => other,
        }
    }
}

impl From<String> for Intent {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "VIDEO" => Intent::Video,
            "TEXT" => Intent::Text,
            _ => Intent::Other(raw),
        }
    }
}

impl From<Intent> for String {
    fn from(intent: Intent) -> Self {
        intent.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: Intent,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
    /// Passed through untouched; the classifier sometimes pre-processes videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_result: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct IntentClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
    health_timeout: Duration,
}

impl IntentClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url, None)
    }

    pub fn with_client(client: Client, base_url: &str, timeout: Option<Duration>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn classify(&self, message: &str) -> Result<IntentResult> {
        let url = format!("{}/classify", self.base_url);

        // The message doubles as the video link in case it is one
        let request = ClassifyRequest {
            message,
            youtube_url: message,
        };

        let result: IntentResult =
            post_json(&self.client, Collaborator::Intent, &url, &request, self.timeout).await?;

        tracing::info!(
            "Classified message as {} (confidence {:.2}): {}",
            result.intent.as_str(),
            result.confidence,
            result.reason
        );
        Ok(result)
    }

    pub async fn health(&self) -> Result<()> {
        check_health(&self.client, Collaborator::Intent, &self.base_url, self.health_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_intent_parses_known_and_unknown_values() {
        let video: IntentResult = serde_json::from_value(json!({
            "intent": "VIDEO",
            "confidence": 0.97,
            "reason": "youtube link",
            "message": "https://youtu.be/abc"
        }))
        .unwrap();
        assert_eq!(video.intent, Intent::Video);
        assert!(video.video_result.is_none());

        let other: IntentResult =
            serde_json::from_value(json!({"intent": "SHOPPING"})).unwrap();
        assert_eq!(other.intent, Intent::Other("SHOPPING".to_string()));
        assert_eq!(other.confidence, 0.0);
    }

    #[test]
    fn test_intent_is_case_sensitive() {
        assert_eq!(Intent::from("video".to_string()), Intent::Other("video".to_string()));
        assert_eq!(String::from(Intent::Text), "TEXT");
    }
}
