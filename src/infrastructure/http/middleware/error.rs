use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::application::services::{JobError, LoginError};
use crate::domain::entities::{ACCESS_DENIED_PATH, LOGIN_PATH};
use crate::domain::errors::{DomainError, UpstreamError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// No session, or the backend rejected the token
    Unauthorized,
    /// The operator's role lacks the page
    Forbidden(String),
    /// Session still hydrating
    Loading,
    Conflict(String),
    Internal(String),
    /// A backend rejection passed through with its status
    Upstream { status: StatusCode, message: String },
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Loading => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream { status, .. } => *status,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Route the front end should move to after this error, if any.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            ApiError::Unauthorized => Some(LOGIN_PATH),
            ApiError::Forbidden(_) => Some(ACCESS_DENIED_PATH),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized"),
            ApiError::Forbidden(msg) => write!(f, "{}", msg),
            ApiError::Loading => write!(f, "Session is still loading"),
            ApiError::Conflict(msg) => write!(f, "{}", msg),
            ApiError::Internal(msg) => write!(f, "{}", msg),
            ApiError::Upstream { message, .. } => write!(f, "{}", message),
            ApiError::BadGateway(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.redirect() {
            Some(redirect) => json!({ "error": self.to_string(), "redirect": redirect }),
            None => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized { .. } => ApiError::Unauthorized,
            UpstreamError::Rejected { status, detail } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message: detail,
            },
            e @ (UpstreamError::Transport(_) | UpstreamError::Decode(_)) => {
                ApiError::BadGateway(e.to_string())
            }
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Rejected(detail) => ApiError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: detail,
            },
            LoginError::Upstream(e) => e.into(),
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NoJob => ApiError::NotFound(err.to_string()),
            JobError::NotActive { .. } => ApiError::Conflict(err.to_string()),
            JobError::Upstream(e) => e.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
