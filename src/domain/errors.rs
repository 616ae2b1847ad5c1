use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures talking to the external SYNCAR backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// HTTP 401: a rejected bearer token, or bad credentials on login.
    #[error("{detail}")]
    Unauthorized { detail: String },
    /// Any other non-2xx answer, carrying the backend's `detail` message.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("Upstream request failed: {0}")]
    Transport(String),
    #[error("Unexpected upstream response: {0}")]
    Decode(String),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;
