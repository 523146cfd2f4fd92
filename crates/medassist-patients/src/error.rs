use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response is not valid JSON: {0}")]
    Parse(String),

    #[error("response has no patient list: {0}")]
    UnexpectedShape(String),

    #[error("no credential available: {0}")]
    Credential(String),
}

impl FetchError {
    /// Whether calling `refresh` again may succeed without other changes.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Credential(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    #[error("patient name is empty")]
    Rejected,
}
