//! Error types for sgs-runs

use thiserror::Error;

/// Result type alias for run-configuration operations
pub type Result<T> = std::result::Result<T, RunsError>;

/// Main error type for run-configuration operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "native", derive(uniffi::Error), uniffi(flat_error))]
pub enum RunsError {
    /// Code text is not valid base58
    #[error("Decode error: {0}")]
    Decode(String),

    /// Flag name is not part of the group's vocabulary
    #[error("Unknown flag '{name}' in group {group}")]
    UnknownFlag { group: String, name: String },

    /// Group name does not match any declared group
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Settings file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<bs58::decode::Error> for RunsError {
    fn from(err: bs58::decode::Error) -> Self {
        RunsError::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for RunsError {
    fn from(err: toml::de::Error) -> Self {
        RunsError::Config(err.to_string())
    }
}

impl From<std::io::Error> for RunsError {
    fn from(err: std::io::Error) -> Self {
        RunsError::Config(err.to_string())
    }
}
