use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifyError>;

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("network error: {0}")]
    Network(String),

    #[error("gateway error (status {status}): {body}")]
    Gateway { status: u16, body: String },

    #[error("gateway response did not match the expected shape: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Network(err.to_string())
    }
}
