use thiserror::Error;

use crate::component::Edge;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No refresh component attached to the {0} edge")]
    EmptySlot(Edge),

    #[error("The {0} refresh component is not an auto-load component")]
    NotAutoLoad(Edge),

    #[error("The {0} refresh component is not a top pull component")]
    NotTopPull(Edge),

    #[error("Invalid script at line {line}: {message}")]
    InvalidScript { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
