//! Error types for the HTTP request parser.

use thiserror::Error;

/// Errors that can occur while reading a request off the wire.
///
/// Every variant except [`Error::Io`] describes a malformed request and is
/// answered with `400 Bad Request`.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line has no tokens at all.
    #[error("Syntax error.")]
    SyntaxError,

    /// The request line has a method but no target.
    #[error("Missing URI.")]
    MissingUri,

    /// A percent escape is truncated, not hex, or decodes to invalid UTF-8.
    #[error("Bad percent-encoding.")]
    BadPercentEncoding,

    /// A header line has no `:` separator.
    #[error("Invalid header line: {0}")]
    InvalidHeaderFormat(String),

    /// A request line or header line is not valid UTF-8.
    #[error("Request is not valid text")]
    InvalidEncoding,

    /// The stream failed while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the client should be told about this error with a `400`.
    ///
    /// I/O failures abort the connection silently instead.
    pub fn is_malformed_request(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
