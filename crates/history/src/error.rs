use thiserror::Error;

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors raised while loading history configuration.
///
/// The aggregation and ordering functions themselves are total and never
/// produce these.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML for this schema
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HistoryError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
