use thiserror::Error;

/// Failure of a single request to a weather provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a readable response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("HTTP error! Status: {status}")]
    Status { status: u16, body: String },

    /// The body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Provider reply body for non-success statuses, for logs only.
    pub fn reply_body(&self) -> Option<&str> {
        match self {
            FetchError::Status { body, .. } if !body.is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}
