use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{check_health, post_json, AgentReply};
use crate::collaborator::Collaborator;
use crate::config::{DEFAULT_HEALTH_TIMEOUT_SECS, DEFAULT_VIDEO_TIMEOUT_SECS};
use crate::error::Result;

#[derive(Serialize)]
struct ProcessRequest<'a> {
    youtube_url: &'a str,
    message: &'a str,
}

/// Extracts recipes from YouTube videos. Slow: transcription can take minutes.
#[derive(Clone)]
pub struct VideoClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl VideoClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(
            Client::new(),
            base_url,
            Duration::from_secs(DEFAULT_VIDEO_TIMEOUT_SECS),
        )
    }

    pub fn with_client(client: Client, base_url: &str, timeout: Duration) -> Self {
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

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn process(&self, url: &str) -> Result<AgentReply> {
        let endpoint = format!("{}/process", self.base_url);
        let request = ProcessRequest {
            youtube_url: url,
            message: url,
        };

        post_json(
            &self.client,
            Collaborator::Video,
            &endpoint,
            &request,
            Some(self.timeout),
        )
        .await
    }

    // Health checks never wait out the processing timeout
    pub async fn health(&self) -> Result<()> {
        check_health(&self.client, Collaborator::Video, &self.base_url, self.health_timeout).await
    }
}
