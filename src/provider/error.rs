//! Error type shared by every provider backend.

use thiserror::Error;

/// Failure talking to a remote provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend answered with a non-success HTTP status.
    #[error("API Error {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout, or body decoding failure.
    #[error("Error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProviderError {
    /// HTTP status code, when the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Turns a non-success response into [`ProviderError::Status`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}
