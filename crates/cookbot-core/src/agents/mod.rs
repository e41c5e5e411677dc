//! HTTP clients for the three agent services.
//!
//! Each call is a single attempt: no retries, no partial results. Failures
//! come back as [`ServiceError::Unavailable`] naming the service.

pub mod intent;
pub mod shopping;
pub mod video;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::collaborator::Collaborator;
use crate::config::Config;
use crate::error::{Result, ServiceError, ServiceErrorKind};
use crate::ingredient::Ingredient;

pub use intent::{Intent, IntentClient, IntentResult};
pub use shopping::ShoppingClient;
pub use video::VideoClient;

/// Reply shape shared by the shopping and video agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    pub answer: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub recipe: Vec<String>,
}

/// Everything the router and health monitor need from the services.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn classify(&self, message: &str) -> Result<IntentResult>;
    async fn shopping_chat(&self, message: &str) -> Result<AgentReply>;
    async fn video_process(&self, url: &str) -> Result<AgentReply>;
    async fn health(&self, service: Collaborator) -> Result<()>;
}

#[derive(Clone)]
pub struct ServiceClient {
    intent: IntentClient,
    shopping: ShoppingClient,
    video: VideoClient,
}

impl ServiceClient {
    pub fn new(intent: IntentClient, shopping: ShoppingClient, video: VideoClient) -> Self {
        Self {
            intent,
            shopping,
            video,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Client::new();
        let request_timeout = config.request_timeout();
        let health_timeout = config.health_timeout();

        Self {
            intent: IntentClient::with_client(
                client.clone(),
                &config.base_url(Collaborator::Intent),
                request_timeout,
            )
            .with_health_timeout(health_timeout),
            shopping: ShoppingClient::with_client(
                client.clone(),
                &config.base_url(Collaborator::Shopping),
                request_timeout,
            )
            .with_health_timeout(health_timeout),
            video: VideoClient::with_client(
                client,
                &config.base_url(Collaborator::Video),
                config.video_timeout(),
            )
            .with_health_timeout(health_timeout),
        }
    }

    pub fn base_url(&self, service: Collaborator) -> &str {
        match service {
            Collaborator::Intent => self.intent.base_url(),
            Collaborator::Shopping => self.shopping.base_url(),
            Collaborator::Video => self.video.base_url(),
        }
    }
}

#[async_trait]
impl Backend for ServiceClient {
    async fn classify(&self, message: &str) -> Result<IntentResult> {
        self.intent.classify(message).await
    }

    async fn shopping_chat(&self, message: &str) -> Result<AgentReply> {
        self.shopping.chat(message).await
    }

    async fn video_process(&self, url: &str) -> Result<AgentReply> {
        self.video.process(url).await
    }

    async fn health(&self, service: Collaborator) -> Result<()> {
        match service {
            Collaborator::Intent => self.intent.health().await,
            Collaborator::Shopping => self.shopping.health().await,
            Collaborator::Video => self.video.health().await,
        }
    }
}

pub(crate) async fn post_json<B, T>(
    client: &Client,
    service: Collaborator,
    url: &str,
    body: &B,
    timeout: Option<Duration>,
) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    tracing::debug!("POST {} ({})", url, service);

    let mut request = client.post(url).json(body);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ServiceError::from_reqwest(service, e))?;

    if !response.status().is_success() {
        let status = response.status();
        tracing::warn!("{} service returned {}", service, status);
        return Err(ServiceError::unavailable(
            service,
            ServiceErrorKind::Http {
                status: status.as_u16(),
            },
        ));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ServiceError::from_reqwest(service, e))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::unavailable(service, ServiceErrorKind::Parse(e.to_string())))
}

pub(crate) async fn check_health(
    client: &Client,
    service: Collaborator,
    base_url: &str,
    timeout: Duration,
) -> Result<()> {
    let url = format!("{}/health", base_url);

    let response = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ServiceError::from_reqwest(service, e))?;

    if !response.status().is_success() {
        return Err(ServiceError::unavailable(
            service,
            ServiceErrorKind::Http {
                status: response.status().as_u16(),
            },
        ));
    }

    Ok(())
}
