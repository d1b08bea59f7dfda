use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid fee schedule entry for '{asset_type}': {reason}")]
    InvalidFeeRule { asset_type: String, reason: String },
}
