use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::ApiError;
use thiserror::Error;

/// Every way a route-weather request can fail. The payload of each variant is
/// the message shown to the client.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Bad client input.
    #[error("{0}")]
    Validation(String),
    /// A provider credential is missing from the server configuration.
    #[error("{0}")]
    Config(String),
    /// An upstream provider answered with a business-level failure.
    #[error("{0}")]
    Upstream(String),
    /// An upstream provider could not be reached or its body was not JSON.
    #[error("API request failed: {0}")]
    Transport(String),
    #[error("Server error: {0}")]
    Server(String),
}

impl AggregateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AggregateError::Validation(_) | AggregateError::Upstream(_) => StatusCode::BAD_REQUEST,
            AggregateError::Config(_)
            | AggregateError::Transport(_)
            | AggregateError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Joins an error with every cause beneath it, outermost first.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// The request URL carries provider credentials, so it is stripped before the
/// error can reach a log line or a response body.
impl From<reqwest::Error> for AggregateError {
    fn from(err: reqwest::Error) -> Self {
        AggregateError::Transport(with_causes(&err.without_url()))
    }
}

/// A body that is not JSON at all counts as a failed request. A JSON body of
/// the wrong shape is a server fault.
impl From<serde_json::Error> for AggregateError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            AggregateError::Transport(err.to_string())
        } else {
            AggregateError::Server(err.to_string())
        }
    }
}

impl IntoResponse for AggregateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiError {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
