use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to resolve storage paths: {details}")]
    StoragePathResolution { details: String },
    #[error("failed to create storage directory {path}: {source}")]
    StorageDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read session vault at {path}: {source}")]
    SessionVaultRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write session vault at {path}: {source}")]
    SessionVaultWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build async runtime: {source}")]
    RuntimeBuild {
        #[source]
        source: std::io::Error,
    },
    #[error("login to {base_url} failed: {details}")]
    LoginFailed { base_url: String, details: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
