use std::fmt;

/// One of the three agent services the assistant talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    Intent,
    Shopping,
    Video,
}

impl Collaborator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collaborator::Intent => "intent",
            Collaborator::Shopping => "shopping",
            Collaborator::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "intent" => Some(Collaborator::Intent),
            "shopping" => Some(Collaborator::Shopping),
            "video" => Some(Collaborator::Video),
            _ => None,
        }
    }

    pub fn all() -> Vec<Collaborator> {
        vec![Collaborator::Intent, Collaborator::Shopping, Collaborator::Video]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Collaborator::Intent => "Intent Classifier",
            Collaborator::Shopping => "Recipe & Shopping",
            Collaborator::Video => "Video Recipes",
        }
    }

    /// Origin the local dev proxy forwards to.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Collaborator::Intent => "http://localhost:8001",
            Collaborator::Shopping => "http://localhost:8002",
            Collaborator::Video => "http://localhost:8003",
        }
    }

    pub fn proxy_prefix(&self) -> &'static str {
        match self {
            Collaborator::Intent => "/api/intent",
            Collaborator::Shopping => "/api/shopping",
            Collaborator::Video => "/api/video",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
