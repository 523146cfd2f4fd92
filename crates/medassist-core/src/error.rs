use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown patient status: {0}")]
    UnknownStatus(String),
}
