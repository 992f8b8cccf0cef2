use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColetorError {
    #[error("Zip operation failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Geography catalog request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geography catalog returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("No records to export")]
    EmptyDataset,
}

impl ColetorError {
    /// True for failures of the remote geography catalog. These are recovered
    /// locally (placeholder state in the affected selector) and never end the
    /// session.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ColetorError::Network(_) | ColetorError::UpstreamStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ColetorError>;
