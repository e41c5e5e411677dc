//! Failure taxonomy for calls to the agent services.
//!
//! Every failure is surfaced as [`ServiceError::Unavailable`], which names the
//! collaborator and keeps the underlying cause for logging. The conversation
//! layer never shows any of this to the user.

use thiserror::Error;

use crate::collaborator::Collaborator;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceErrorKind {
    /// The service could not be reached at all.
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },
    #[error("request timed out")]
    Timeout,
    /// The body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ServiceErrorKind {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceErrorKind::Timeout
        } else if err.is_decode() {
            ServiceErrorKind::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceErrorKind::Http {
                status: status.as_u16(),
            }
        } else {
            ServiceErrorKind::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{service} service unavailable: {kind}")]
    Unavailable {
        service: Collaborator,
        #[source]
        kind: ServiceErrorKind,
    },
}

impl ServiceError {
    pub fn unavailable(service: Collaborator, kind: ServiceErrorKind) -> Self {
        ServiceError::Unavailable { service, kind }
    }

    pub fn from_reqwest(service: Collaborator, err: reqwest::Error) -> Self {
        Self::unavailable(service, err.into())
    }

    pub fn service(&self) -> Collaborator {
        match self {
            ServiceError::Unavailable { service, .. } => *service,
        }
    }

    pub fn kind(&self) -> &ServiceErrorKind {
        match self {
            ServiceError::Unavailable { kind, .. } => kind,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), ServiceErrorKind::Timeout)
    }
}
