//! Error type shared by the archmap crates

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph has no `{0}` folder; traversal and hierarchy listing need one")]
    MissingRoot(String),

    #[error("no node matches `{0}`")]
    UnknownNode(String),

    #[error("`{0}` is not a folder")]
    NotAFolder(String),

    #[error("invalid depth `{0}`: expected a non-negative integer or `unlimited`")]
    InvalidDepth(String),
}

pub type Result<T> = std::result::Result<T, ArchmapError>;
