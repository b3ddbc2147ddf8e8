use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    #[error("Invalid folder id: {0:?}")]
    InvalidFolderId(String),
}

pub type Result<T> = std::result::Result<T, TraversalError>;
