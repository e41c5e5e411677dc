//! Service health aggregation.
//!
//! Each service is checked on its own; one failing check never changes
//! another service's flag.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::agents::Backend;
use crate::collaborator::Collaborator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub intent: bool,
    pub shopping: bool,
    pub video: bool,
}

impl HealthStatus {
    pub fn get(&self, service: Collaborator) -> bool {
        match service {
            Collaborator::Intent => self.intent,
            Collaborator::Shopping => self.shopping,
            Collaborator::Video => self.video,
        }
    }

    pub fn all_healthy(&self) -> bool {
        self.intent && self.shopping && self.video
    }
}

#[derive(Clone)]
pub struct HealthMonitor {
    backend: Arc<dyn Backend>,
}

impl HealthMonitor {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn poll(&self) -> HealthStatus {
        let (intent, shopping, video) = tokio::join!(
            self.check(Collaborator::Intent),
            self.check(Collaborator::Shopping),
            self.check(Collaborator::Video),
        );

        HealthStatus {
            intent,
            shopping,
            video,
        }
    }

    async fn check(&self, service: Collaborator) -> bool {
        match self.backend.health(service).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    /// One-off poll on a background task.
    pub fn spawn_poll(&self) -> mpsc::UnboundedReceiver<HealthStatus> {
        let (tx, rx) = mpsc::unbounded_channel();
        let monitor = self.clone();
        tokio::spawn(async move {
            let _ = tx.send(monitor.poll().await);
        });
        rx
    }

    /// Poll every `interval` until the receiver is dropped. The first poll
    /// happens immediately.
    pub fn spawn_periodic(&self, interval: Duration) -> mpsc::UnboundedReceiver<HealthStatus> {
        let (tx, rx) = mpsc::unbounded_channel();
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if tx.send(monitor.poll().await).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
