use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read implementations directory {path}: {source}")]
    ReadDir { path: PathBuf, source: std::io::Error },
    #[error("failed to read manifest {path}: {source}")]
    ReadManifest { path: PathBuf, source: std::io::Error },
    #[error("invalid manifest {path}: {source}")]
    InvalidManifest { path: PathBuf, source: serde_json::Error },
    #[error("implementation `{0}` is declared more than once")]
    DuplicateImplementation(String),
    #[error("unknown implementation `{0}`")]
    UnknownImplementation(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(reqwest::Error),
    #[error("invalid header `{0}`")]
    InvalidHeader(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport { endpoint: String, source: reqwest::Error },
    #[error("{endpoint} answered with status {status}: {body}")]
    UnexpectedStatus { endpoint: String, status: u16, body: String },
    #[error("{endpoint} answered with a body that is not a credential: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}
