use std::fmt;
use thiserror::Error;

/// The error type for signature construction and verification
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A component named in the list cannot be resolved against the message
    /// (header absent, or `@query` on a target without a query)
    ComponentMissing,

    /// A component is not applicable to this message type, or the derived
    /// component name is not recognized
    ComponentInvalid,

    /// The signing capability rejected the signature base
    SigningFailed,

    /// A signature header value or its base64 payload is malformed
    EncodingFailed,

    /// The signature does not cover this message, or is absent entirely
    SignatureInvalid,

    /// Unexpected errors (formatting, header emission, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

// Convenience constructors
impl Error {
    /// Create a missing component error
    pub fn component_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ComponentMissing, message)
    }

    /// Create an invalid component error
    pub fn component_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ComponentInvalid, message)
    }

    /// Create a signing failure error
    pub fn signing_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SigningFailed, message)
    }

    /// Create an encoding failure error
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodingFailed, message)
    }

    /// Create an invalid signature error
    pub fn signature_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignatureInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ComponentMissing => write!(f, "missing component"),
            ErrorKind::ComponentInvalid => write!(f, "invalid component"),
            ErrorKind::SigningFailed => write!(f, "signing failed"),
            ErrorKind::EncodingFailed => write!(f, "encoding failed"),
            ErrorKind::SignatureInvalid => write!(f, "invalid signature"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
