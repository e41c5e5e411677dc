//! Runs one user message through classification and routing, and feeds the
//! outcome back into a [`Conversation`].

use tokio::sync::mpsc;

use crate::agents::AgentReply;
use crate::error::ServiceError;
use crate::router::{IntentRouter, Route};
use crate::state::Conversation;

#[derive(Debug)]
pub enum ExchangeEvent {
    /// The message was sent to the video agent; expect a long wait.
    VideoStarted,
    Finished(Result<AgentReply, ServiceError>),
}

/// Route `message` on a background task. The receiver yields `VideoStarted`
/// (video route only) and then exactly one `Finished`.
pub fn spawn_exchange(router: IntentRouter, message: String) -> mpsc::UnboundedReceiver<ExchangeEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let progress = tx.clone();
        let result = router
            .route_with(&message, move |route| {
                if route == Route::Video {
                    let _ = progress.send(ExchangeEvent::VideoStarted);
                }
            })
            .await;
        let _ = tx.send(ExchangeEvent::Finished(result));
    });

    rx
}

impl Conversation {
    pub fn apply(&mut self, event: ExchangeEvent) -> bool {
        match event {
            ExchangeEvent::VideoStarted => self.begin_video(),
            ExchangeEvent::Finished(Ok(reply)) => self.resolve(reply),
            ExchangeEvent::Finished(Err(e)) => self.fail(&e),
        }
    }
}

/// Submit `text` and drive the whole exchange in place. Returns false when
/// the submission was refused (blank text or already busy).
pub async fn run_exchange(conversation: &mut Conversation, router: &IntentRouter, text: &str) -> bool {
    if !conversation.submit(text) {
        return false;
    }

    let result = router
        .route_with(text.trim(), |route| {
            if route == Route::Video {
                conversation.begin_video();
            }
        })
        .await;

    match result {
        Ok(reply) => conversation.resolve(reply),
        Err(e) => conversation.fail(&e),
    };
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::Collaborator;
    use crate::router::tests::FakeBackend;
    use crate::state::{Speaker, APOLOGY_TEXT, VIDEO_PLACEHOLDER_TEXT};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_run_exchange_adds_two_turns() {
        let backend = Arc::new(FakeBackend::with_intent("TEXT"));
        let router = IntentRouter::new(backend);
        let mut conversation = Conversation::new();

        for (i, message) in ["pasta", "  what about dessert?  "].iter().enumerate() {
            assert!(run_exchange(&mut conversation, &router, message).await);
            assert_eq!(conversation.transcript_len(), (i + 1) * 2);
            assert!(!conversation.is_busy());
        }
    }

    #[tokio::test]
    async fn test_run_exchange_video_leaves_no_placeholder() {
        let backend = Arc::new(FakeBackend::with_intent("VIDEO"));
        let router = IntentRouter::new(backend);
        let mut conversation = Conversation::new();

        run_exchange(&mut conversation, &router, "https://youtu.be/abc").await;

        assert_eq!(conversation.transcript_len(), 2);
        assert!(conversation
            .turns()
            .all(|turn| turn.text != VIDEO_PLACEHOLDER_TEXT));
        assert_eq!(conversation.recipe(), ["Crack the egg".to_string()]);
    }

    #[tokio::test]
    async fn test_run_exchange_blank_is_refused() {
        let backend = Arc::new(FakeBackend::with_intent("TEXT"));
        let router = IntentRouter::new(backend.clone());
        let mut conversation = Conversation::new();

        assert!(!run_exchange(&mut conversation, &router, "   ").await);
        assert!(conversation.is_empty());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shopping_failure_appends_one_apology() {
        let backend = Arc::new(FakeBackend::with_intent("TEXT").failing(Collaborator::Shopping));
        let router = IntentRouter::new(backend);
        let mut conversation = Conversation::new();

        run_exchange(&mut conversation, &router, "pasta").await;

        let turns: Vec<_> = conversation.turns().collect();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[1].speaker, Speaker::Agent);
        assert_eq!(turns[1].text, APOLOGY_TEXT);
        assert!(conversation.ingredients().is_empty());
        assert!(conversation.recipe().is_empty());
        assert!(!conversation.is_busy());
    }

    #[tokio::test]
    async fn test_spawned_video_exchange_reports_progress() {
        let backend = Arc::new(FakeBackend::with_intent("VIDEO"));
        let router = IntentRouter::new(backend);
        let mut conversation = Conversation::new();
        conversation.submit("https://youtu.be/abc");

        let mut rx = spawn_exchange(router, "https://youtu.be/abc".to_string());

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, ExchangeEvent::VideoStarted));
        conversation.apply(first);
        assert_eq!(conversation.placeholder().unwrap().text, VIDEO_PLACEHOLDER_TEXT);

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, ExchangeEvent::Finished(Ok(_))));
        conversation.apply(second);
        assert_eq!(conversation.transcript_len(), 2);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_spawned_shopping_exchange_skips_video_event() {
        let backend = Arc::new(FakeBackend::with_intent("TEXT"));
        let mut rx = spawn_exchange(IntentRouter::new(backend), "pasta".to_string());

        assert!(matches!(rx.recv().await, Some(ExchangeEvent::Finished(Ok(_)))));
        assert!(rx.recv().await.is_none());
    }
}
