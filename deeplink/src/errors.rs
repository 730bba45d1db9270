use thiserror::Error;

/// Result type alias for deep link service operations
pub type Result<T, E = DeepLinkError> = std::result::Result<T, E>;

/// Failures while producing a response. Every variant surfaces to clients as
/// a 500; expected client mistakes are modelled by
/// [`RouteError`](crate::resource::RouteError) instead.
#[derive(Error, Debug)]
pub enum DeepLinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build response: {0}")]
    ResponseBuild(#[from] http::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
