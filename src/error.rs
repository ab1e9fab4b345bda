use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Python {found} is too old, at least {required} is required")]
    VersionInsufficient { found: String, required: String },

    #[error("Python interpreter not found: {0}")]
    InterpreterNotFound(String),

    #[error("Failed to activate virtual environment at {}", .0.display())]
    ActivationFailure(PathBuf),

    #[error("Failed to install dependencies: {0}")]
    DependencyInstallation(String),

    #[error("AWS SSO login failed: {0}")]
    SsoLoginFailed(String),

    #[error("Data load failed: {0}")]
    DataLoad(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
