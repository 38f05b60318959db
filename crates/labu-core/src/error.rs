//! Error types for the Controller.
//!
//! These map directly onto the control-plane error taxonomy: [`CoreError::NotFound`]
//! and [`CoreError::UnknownClient`] are classification errors the Controller
//! returns immediately; [`CoreError::Runtime`] wraps an adapter failure
//! surfaced verbatim.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(#[from] labu_config::ConfigError),

    #[error("runtime error: {0}")]
    Runtime(#[from] labu_runtime::RuntimeError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unknown client: {0}")]
    UnknownClient(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
