use repo_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("handle not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    RepoCore(#[from] repo_core::RepoCoreError),

    #[error(transparent)]
    RepoCache(#[from] repo_cache::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::RepoCore(e) => e.kind(),
            Error::RepoCache(repo_cache::Error::RefUnresolvable(_)) => ErrorKind::RefUnresolvable,
            Error::RepoCache(_) => ErrorKind::ProviderUnavailable,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
