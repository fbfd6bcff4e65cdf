//! Common error types used throughout imagepost.
//!
//! Every failure that can reach an HTTP handler is one of these variants.
//! [`Error::http_status`] is the single table mapping a kind to its status.

/// Common error type for imagepost.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was malformed, e.g. the upload had no image file.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The input bytes are not a decodable image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The codec rejected the requested format or quality.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// The request body exceeded the upload size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The requested image was not found.
    #[error("Image not found: {0}")]
    NotFound(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new BadRequest error.
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a new PayloadTooLarge error.
    pub fn payload_too_large<S: Into<String>>(msg: S) -> Self {
        Self::PayloadTooLarge(msg.into())
    }

    /// Create a new Decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new Encode error.
    pub fn encode<S: Into<String>>(msg: S) -> Self {
        Self::Encode(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code for this error kind.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::Decode(_) | Self::Encode(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
