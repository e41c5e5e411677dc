use std::sync::Arc;

use crate::agents::{AgentReply, Backend, Intent};
use crate::collaborator::Collaborator;
use crate::error::Result;

/// Where a classified message goes. Only `VIDEO` reaches the video agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Shopping,
    Video,
}

impl Route {
    pub fn for_intent(intent: &Intent) -> Self {
        match intent {
            Intent::Video => Route::Video,
            Intent::Text | Intent::Other(_) => Route::Shopping,
        }
    }

    pub fn target(&self) -> Collaborator {
        match self {
            Route::Shopping => Collaborator::Shopping,
            Route::Video => Collaborator::Video,
        }
    }
}

/// Classifies a message and hands it to the matching agent. Errors from any
/// call are returned as-is; there is no retry or fallback here.
#[derive(Clone)]
pub struct IntentRouter {
    backend: Arc<dyn Backend>,
}

impl IntentRouter {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn route(&self, message: &str) -> Result<AgentReply> {
        self.route_with(message, |_| {}).await
    }

    /// Like [`route`](Self::route), calling `on_dispatch` once the target agent
    /// is known and before it is called.
    pub async fn route_with<F>(&self, message: &str, on_dispatch: F) -> Result<AgentReply>
    where
        F: FnOnce(Route) + Send,
    {
        let classified = self.backend.classify(message).await?;
        let route = Route::for_intent(&classified.intent);
        tracing::debug!("Routing to {}", route.target());

        on_dispatch(route);

        match route {
            Route::Video => self.backend.video_process(message).await,
            Route::Shopping => self.backend.shopping_chat(message).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::agents::IntentResult;
    use crate::error::{ServiceError, ServiceErrorKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory backend that records what was called.
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub intent: String,
        pub fail: Option<Collaborator>,
        pub reply: AgentReply,
        pub calls: Mutex<Vec<Collaborator>>,
    }

    impl FakeBackend {
        pub fn with_intent(intent: &str) -> Self {
            Self {
                intent: intent.to_string(),
                reply: AgentReply {
                    answer: "answer".to_string(),
                    ingredients: vec!["egg".into()],
                    recipe: vec!["Crack the egg".to_string()],
                },
                ..Self::default()
            }
        }

        pub fn failing(mut self, service: Collaborator) -> Self {
            self.fail = Some(service);
            self
        }

        pub fn calls(&self) -> Vec<Collaborator> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, service: Collaborator) -> Result<()> {
            self.calls.lock().unwrap().push(service);
            if self.fail == Some(service) {
                return Err(ServiceError::unavailable(
                    service,
                    ServiceErrorKind::Network("connection refused".to_string()),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn classify(&self, message: &str) -> Result<IntentResult> {
            self.record(Collaborator::Intent)?;
            Ok(IntentResult {
                intent: Intent::from(self.intent.clone()),
                confidence: 0.9,
                reason: "test".to_string(),
                message: message.to_string(),
                video_result: None,
            })
        }

        async fn shopping_chat(&self, _message: &str) -> Result<AgentReply> {
            self.record(Collaborator::Shopping)?;
            Ok(self.reply.clone())
        }

        async fn video_process(&self, _url: &str) -> Result<AgentReply> {
            self.record(Collaborator::Video)?;
            Ok(self.reply.clone())
        }

        async fn health(&self, service: Collaborator) -> Result<()> {
            self.record(service)
        }
    }

    #[tokio::test]
    async fn test_video_intent_calls_video_only() {
        let backend = Arc::new(FakeBackend::with_intent("VIDEO"));
        let router = IntentRouter::new(backend.clone());

        let reply = router.route("https://youtu.be/abc").await.unwrap();
        assert_eq!(reply.answer, "answer");
        assert_eq!(backend.calls(), vec![Collaborator::Intent, Collaborator::Video]);
    }

    #[tokio::test]
    async fn test_other_intents_call_shopping_only() {
        for intent in ["TEXT", "SHOPPING", "video", ""] {
            let backend = Arc::new(FakeBackend::with_intent(intent));
            let router = IntentRouter::new(backend.clone());

            router.route("kimchi stew").await.unwrap();
            assert_eq!(
                backend.calls(),
                vec![Collaborator::Intent, Collaborator::Shopping],
                "intent {:?}",
                intent
            );
        }
    }

    #[tokio::test]
    async fn test_classify_failure_stops_routing() {
        let backend = Arc::new(FakeBackend::with_intent("VIDEO").failing(Collaborator::Intent));
        let router = IntentRouter::new(backend.clone());

        let err = router.route("anything").await.unwrap_err();
        assert_eq!(err.service(), Collaborator::Intent);
        assert_eq!(backend.calls(), vec![Collaborator::Intent]);
    }

    #[tokio::test]
    async fn test_agent_failure_propagates_unchanged() {
        let backend = Arc::new(FakeBackend::with_intent("TEXT").failing(Collaborator::Shopping));
        let router = IntentRouter::new(backend);

        let err = router.route("pasta").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::unavailable(
                Collaborator::Shopping,
                ServiceErrorKind::Network("connection refused".to_string())
            )
        );
    }

    #[tokio::test]
    async fn test_on_dispatch_sees_route_before_agent_call() {
        let backend = Arc::new(FakeBackend::with_intent("VIDEO"));
        let router = IntentRouter::new(backend.clone());

        let mut seen = None;
        router
            .route_with("https://youtu.be/abc", |route| {
                seen = Some((route, backend.calls().len()));
            })
            .await
            .unwrap();

        // Only the classify call had happened when the hook ran
        assert_eq!(seen, Some((Route::Video, 1)));
    }
}
