use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::dtos::error_dto::ErrorBody;

pub type AppResult<T> = Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("URL parameter is required")]
    MissingParameter,

    #[error("Invalid URL")]
    MalformedUrl,

    // the upstream answered, just not with something we can hand to the player
    #[error("Failed to fetch: {status} {reason}")]
    UpstreamRejected { status: u16, reason: String },

    // the detail is logged where it happens, the client only sees the generic message
    #[error("Proxy request failed")]
    UpstreamUnreachable(String),

    #[error("Proxy request failed")]
    UnexpectedFailure(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter | Self::MalformedUrl => StatusCode::BAD_REQUEST,
            Self::UpstreamRejected { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamUnreachable(_) | Self::UnexpectedFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn upstream_rejected(status: StatusCode) -> Self {
        Self::UpstreamRejected {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // cors headers are added by the router layer so browsers can read this body too
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
