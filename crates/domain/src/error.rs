/// Shared error type used across all Redverse identity crates.
///
/// Lookup misses are never errors — sources return `Ok(None)` for those.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("directory: {0}")]
    Directory(String),

    #[error("mapping store: {0}")]
    MappingStore(String),

    #[error("datastore: {0}")]
    Datastore(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
