use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("object fetch failed: {message}")]
pub struct FetchError {
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("decompression failed: {message}")]
pub struct DecompressionError {
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("log stream setup failed: {message}")]
pub struct StreamSetupError {
    pub message: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("log event append failed: {message}")]
pub struct AppendError {
    pub message: String,
}

/// Any failure that aborts the current invocation. The external dispatcher
/// owns retry and redelivery; nothing here is retried internally.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decompression(#[from] DecompressionError),
    #[error(transparent)]
    StreamSetup(#[from] StreamSetupError),
    #[error(transparent)]
    Append(#[from] AppendError),
}
