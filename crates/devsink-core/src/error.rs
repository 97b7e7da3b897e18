// crates/devsink-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceIdError {
    #[error("device id is empty")]
    Empty,

    #[error("device id '{value}' does not match the {profile} pattern")]
    PatternMismatch { value: String, profile: &'static str },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to create device directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be a valid IP address, got '{value}'")]
    InvalidBind { var: &'static str, value: String },

    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be 'standard' or 'extended', got '{value}'")]
    InvalidProfile { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

pub type Result<T> = std::result::Result<T, StoreError>;
