use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Invalid root folder: {0}")]
    InvalidRoot(#[from] core_traversal::TraversalError),

    #[error("Export sink error: {0}")]
    Sink(#[from] bridge_traits::BridgeError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
