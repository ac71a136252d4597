use repo_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("tree-sitter language error for {0}")]
    Language(String),

    #[error("tree-sitter parse error for {0}")]
    Parse(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Internal,
            Error::NotFound(_) | Error::SymbolNotFound(_) => ErrorKind::NotFound,
            Error::Language(_) | Error::Parse(_) => ErrorKind::Internal,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
