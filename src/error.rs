use axum::http::StatusCode;
use thiserror::Error;

/// Failures produced by the gateway core. Display strings are the messages
/// returned to clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Location '{0}' not found")]
    LocationNotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Agent(String),
    #[error("Agent {0} not found")]
    UnknownAgent(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnknownAgent(_) | GatewayError::UnknownTool(_) => StatusCode::NOT_FOUND,
            // Missing locations stay 500, matching the established API contract.
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
