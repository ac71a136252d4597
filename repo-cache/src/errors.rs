use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("unable to resolve ref: {0}")]
    RefUnresolvable(String),

    #[error("invalid source: {0}")]
    InvalidSource(String),
}

pub type Result<T> = std::result::Result<T, Error>;
