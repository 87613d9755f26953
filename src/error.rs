use thiserror::Error;

/// Error type for all converse operations
#[derive(Debug, Error)]
pub enum ConverseError {
    #[error("max_signals must be at least 1, got {max_signals}")]
    InvalidConfiguration { max_signals: usize },
    #[error("signal with key {key} has already been resolved")]
    DuplicateSignal { key: String },
    #[error("a timeout occurred while waiting for signal with key {key}")]
    Timeout { key: String },
}

impl ConverseError {
    /// The signal key this error refers to, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ConverseError::DuplicateSignal { key } | ConverseError::Timeout { key } => Some(key.as_str()),
            ConverseError::InvalidConfiguration { .. } => None,
        }
    }
}
