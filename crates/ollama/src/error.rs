use thiserror::Error;

/// Result type for Ollama client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the Ollama HTTP API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Endpoint name missing from the configured endpoint table
    #[error("Unknown {method} endpoint '{name}'")]
    UnknownEndpoint { method: &'static str, name: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, timeout or other transport failure
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Ollama answered with a non-success status
    #[error("Ollama returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body was not valid JSON
    #[error("Invalid JSON from {url}: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised while turning an image source into a base64 payload
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image file not found: {0}")]
    NotFound(String),

    #[error("{what} too large: {size_mb:.1}MB > {max_mb}MB")]
    TooLarge {
        what: &'static str,
        size_mb: f64,
        max_mb: f64,
    },

    #[error("Invalid or unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image type from URL: {0}")]
    InvalidContentType(String),

    #[error("Failed to fetch image from URL: {0}")]
    Fetch(String),

    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}
