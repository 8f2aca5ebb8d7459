use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CardError>;

/// Terminal failure of a single card request
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Upstream request failed: {0}")]
    UpstreamFailure(String),
    #[error("Upstream returned an error: {0}")]
    UpstreamDataError(String),
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
    #[error("Render error: {0}")]
    Render(String),
}

impl CardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CardError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for CardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CardError::MalformedResponse(err.to_string())
        } else {
            CardError::UpstreamFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CardError {
    fn from(err: serde_json::Error) -> Self {
        CardError::MalformedResponse(err.to_string())
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Card request failed: {}", self);
        } else {
            tracing::debug!("Rejected card request: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
