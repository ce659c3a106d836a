use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetcheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Batch error: {0}")]
    Batch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown suite: {0}")]
    UnknownSuite(String),

    #[error("System error: {0}")]
    System(String),
}

pub type Result<T> = std::result::Result<T, FleetcheckError>;
