use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{check_health, post_json, AgentReply};
use crate::collaborator::Collaborator;
use crate::config::DEFAULT_HEALTH_TIMEOUT_SECS;
use crate::error::Result;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Text recipe and shopping-list agent.
#[derive(Clone)]
pub struct ShoppingClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
    health_timeout: Duration,
}

impl ShoppingClient {
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

    pub async fn chat(&self, message: &str) -> Result<AgentReply> {
        let url = format!("{}/chat", self.base_url);
        let request = ChatRequest { message };

        post_json(&self.client, Collaborator::Shopping, &url, &request, self.timeout).await
    }

    pub async fn health(&self) -> Result<()> {
        check_health(&self.client, Collaborator::Shopping, &self.base_url, self.health_timeout).await
    }
}
