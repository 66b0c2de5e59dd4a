use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZgwError>;

/// Failure of a single upstream query. Carries the URL and the raw response
/// body for diagnostics; the caller decides whether this aborts the whole
/// event (it always does, there is no partial-success state).
#[derive(Debug, Clone, Error)]
pub enum ZgwError {
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("API error (status {status}) from {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },

    #[error("response from {url} did not match the expected shape: {message}")]
    Parse { url: String, message: String },
}
