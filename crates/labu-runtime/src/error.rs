//! Error types for the container runtime adapter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("failed to connect to container runtime: {0}")]
    ConnectionError(String),

    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("image build failed: {0}")]
    BuildError(String),

    #[error("exec failed: {0}")]
    ExecError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("container runtime error: {0}")]
    RuntimeError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
