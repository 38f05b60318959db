use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] labu_config::ConfigError),

    #[error(transparent)]
    Core(#[from] labu_core::CoreError),

    #[error(transparent)]
    Runtime(#[from] labu_runtime::RuntimeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no client image could be built or overridden; aborting the run")]
    NoClientImages,
}
