//! Errors a simulator author can see from the SDK.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("control plane returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid sim configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SdkError>;
