use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config key: {key}. Available keys: {available}")]
    UnknownConfigKey { key: String, available: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Failed to get home directory")]
    NoHomeDirectory,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
