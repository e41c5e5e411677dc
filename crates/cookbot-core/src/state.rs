//! UI-agnostic conversation state
//!
//! [`Conversation`] is the only thing a front end renders from. It changes
//! through five transitions: `submit`, `begin_video`, `resolve`, `fail` and
//! `reset`. Only one exchange is in flight at a time; `submit` is ignored
//! while busy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agents::AgentReply;
use crate::error::ServiceError;
use crate::health::HealthStatus;
use crate::ingredient::Ingredient;

pub const APOLOGY_TEXT: &str =
    "Sorry, the service is temporarily unavailable. Please try again in a moment.";

pub const VIDEO_PLACEHOLDER_TEXT: &str =
    "🎥 Analyzing the YouTube video... this can take 1-3 minutes depending on its length.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// A chat turn in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(text: &str) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn agent(text: &str) -> Self {
        Self::new(Speaker::Agent, text)
    }

    fn new(speaker: Speaker, text: &str) -> Self {
        Self {
            speaker,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Busy,
}

/// Everything a front end needs to draw one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub transcript: Vec<ChatTurn>,
    pub ingredients: Vec<Ingredient>,
    pub recipe: Vec<String>,
    pub is_busy: bool,
    pub health: HealthStatus,
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    transcript: Vec<ChatTurn>,
    // Shown after the transcript while a video is processing; never committed
    placeholder: Option<ChatTurn>,
    ingredients: Vec<Ingredient>,
    recipe: Vec<String>,
    phase: Phase,
    health: HealthStatus,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }

    /// Committed turns followed by the placeholder, if any.
    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.transcript.iter().chain(self.placeholder.iter())
    }

    pub fn transcript_len(&self) -> usize {
        self.transcript.len() + usize::from(self.placeholder.is_some())
    }

    pub fn placeholder(&self) -> Option<&ChatTurn> {
        self.placeholder.as_ref()
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn recipe(&self) -> &[String] {
        &self.recipe
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn is_empty(&self) -> bool {
        self.transcript_len() == 0 && self.ingredients.is_empty() && self.recipe.is_empty()
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            transcript: self.turns().cloned().collect(),
            ingredients: self.ingredients.clone(),
            recipe: self.recipe.clone(),
            is_busy: self.is_busy(),
            health: self.health,
        }
    }

    /// Start an exchange. Returns false (and changes nothing) when the text is
    /// blank or another exchange is still running.
    pub fn submit(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.is_busy() {
            return false;
        }

        self.transcript.push(ChatTurn::user(text));
        self.phase = Phase::Busy;
        true
    }

    /// The exchange was routed to the video agent.
    pub fn begin_video(&mut self) -> bool {
        if !self.is_busy() || self.placeholder.is_some() {
            return false;
        }

        self.placeholder = Some(ChatTurn::agent(VIDEO_PLACEHOLDER_TEXT));
        true
    }

    /// Finish the exchange with the agent's reply. Empty ingredient or recipe
    /// lists leave the ones already shown in place.
    pub fn resolve(&mut self, reply: AgentReply) -> bool {
        if !self.is_busy() {
            return false;
        }

        self.placeholder = None;
        self.transcript.push(ChatTurn::agent(&reply.answer));
        if !reply.ingredients.is_empty() {
            self.ingredients = reply.ingredients;
        }
        if !reply.recipe.is_empty() {
            self.recipe = reply.recipe;
        }
        self.phase = Phase::Idle;
        true
    }

    /// Finish the exchange after a service failure. The error is logged, the
    /// user only sees the fixed apology.
    pub fn fail(&mut self, error: &ServiceError) -> bool {
        if !self.is_busy() {
            return false;
        }

        tracing::warn!("Exchange failed: {}", error);
        self.placeholder = None;
        self.transcript.push(ChatTurn::agent(APOLOGY_TEXT));
        self.phase = Phase::Idle;
        true
    }

    /// Start a new chat. Health flags are kept.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.placeholder = None;
        self.ingredients.clear();
        self.recipe.clear();
        self.phase = Phase::Idle;
    }

    pub fn set_health(&mut self, health: HealthStatus) {
        self.health = health;
    }
}
