pub mod agents;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod exchange;
pub mod health;
pub mod ingredient;
pub mod router;
pub mod state;

// Re-export main types for convenience
pub use agents::{AgentReply, Backend, Intent, IntentResult, ServiceClient};
pub use collaborator::Collaborator;
pub use config::Config;
pub use error::{Result, ServiceError, ServiceErrorKind};
pub use exchange::{run_exchange, spawn_exchange, ExchangeEvent};
pub use health::{HealthMonitor, HealthStatus};
pub use ingredient::{render, Ingredient};
pub use router::{IntentRouter, Route};
pub use state::{ChatTurn, Conversation, ConversationSnapshot, Phase, Speaker};
