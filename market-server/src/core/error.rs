use thiserror::Error;

/// Boot and runtime errors of the server itself
///
/// Request-level failures use [`shared::error::AppError`]; this type covers
/// everything that happens before or around request handling.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for server-level operations
pub type Result<T> = std::result::Result<T, ServerError>;
